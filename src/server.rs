use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::render;

pub const PAGE_FILE: &str = "index.html";

/// Owns the generated page on disk and deletes it when dropped.
#[derive(Debug)]
pub struct PageFile {
    path: PathBuf,
}

impl PageFile {
    pub fn write(root: &Path, table_html: &str) -> Result<Self> {
        let path = root.join(PAGE_FILE);
        std::fs::write(&path, render::page(table_html))?;
        debug!("Wrote {}", path.display());
        Ok(PageFile { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PageFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(e) => warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Static file server for previewing the rendered issues.
///
/// Connections are handled one at a time on the calling task.
pub struct LocalServer {
    root: PathBuf,
    listener: TcpListener,
    page: PageFile,
}

impl LocalServer {
    /// Write `index.html` under `root`, then bind `host:port`.
    ///
    /// The page is removed again if binding fails.
    pub async fn bind(root: &Path, table_html: &str, host: &str, port: u16) -> Result<Self> {
        let page = PageFile::write(root, table_html)?;
        let listener = bind_reusable(host, port).await?;
        Ok(LocalServer {
            root: root.to_path_buf(),
            listener,
            page,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn page_path(&self) -> &Path {
        self.page.path()
    }

    /// Serve requests until `shutdown` resolves. The page file is deleted on
    /// return, whether or not serving failed.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let LocalServer {
            root,
            listener,
            page,
        } = self;
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break Ok(());
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => break Err(e.into()),
                    };
                    debug!("Connection from {}", peer);
                    // a client that never finishes its request must not
                    // hold off shutdown
                    tokio::select! {
                        _ = &mut shutdown => {
                            info!("Shutdown requested while serving {}", peer);
                            break Ok(());
                        }
                        served = handle_connection(stream, &root) => {
                            if let Err(e) = served {
                                warn!("Error serving {}: {}", peer, e);
                            }
                        }
                    }
                }
            }
        };

        drop(page);
        result
    }
}

/// Render `table_html` into `./index.html` and serve the current directory
/// on the configured address until Ctrl-C.
pub async fn serve(table_html: &str, config: &Config) -> Result<()> {
    let root = std::env::current_dir()?;
    serve_in(&root, table_html, config, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => println!("\nServer stopped"),
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    })
    .await
}

/// Serve `root` with the rendered page on the configured address until
/// `shutdown` resolves.
pub async fn serve_in<F>(
    root: &Path,
    table_html: &str,
    config: &Config,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let server = LocalServer::bind(root, table_html, &config.host, config.port).await?;
    println!("serving at port {}", server.local_addr()?.port());
    server.run(shutdown).await
}

async fn bind_reusable(host: &str, port: u16) -> Result<TcpListener> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port)).await?.collect();
    let addr = preferred_addr(&addrs).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("could not resolve {}", host),
        )
    })?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(128)?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// First IPv4 address if there is one, so `localhost` binds `127.0.0.1`
/// rather than `::1`.
fn preferred_addr(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

async fn handle_connection(stream: TcpStream, root: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    // drain headers; bodies are never expected
    loop {
        let mut header = String::new();
        let n = reader.read_line(&mut header).await?;
        if n == 0 || header == "\r\n" || header == "\n" {
            break;
        }
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    debug!("{} {}", method, target);

    let response = match method {
        "GET" | "HEAD" => respond_with_file(root, target).await,
        _ => Response::error(405, "Method Not Allowed"),
    };

    let mut stream = reader.into_inner();
    stream.write_all(response.head().as_bytes()).await?;
    if method != "HEAD" {
        stream.write_all(&response.body).await?;
    }
    stream.flush().await?;
    stream.shutdown().await
}

struct Response {
    status: u16,
    reason: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Response {
    fn error(status: u16, reason: &'static str) -> Self {
        Response {
            status,
            reason,
            content_type: "text/plain; charset=utf-8",
            body: format!("{} {}\n", status, reason).into_bytes(),
        }
    }

    fn head(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            self.reason,
            self.content_type,
            self.body.len()
        )
    }
}

async fn respond_with_file(root: &Path, target: &str) -> Response {
    let Some(path) = resolve_path(root, target) else {
        return Response::error(403, "Forbidden");
    };
    let path = if path.is_dir() {
        path.join(PAGE_FILE)
    } else {
        path
    };

    match tokio::fs::read(&path).await {
        Ok(body) => Response {
            status: 200,
            reason: "OK",
            content_type: content_type(&path),
            body,
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => Response::error(404, "Not Found"),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            Response::error(500, "Internal Server Error")
        }
    }
}

/// Map a percent-encoded request target onto a path under `root`. Targets
/// that would escape `root` or do not decode to UTF-8 yield `None`.
fn resolve_path(root: &Path, target: &str) -> Option<PathBuf> {
    let raw = target.split(['?', '#']).next().unwrap_or("");
    let path = urlencoding::decode(raw).ok()?;
    let mut resolved = root.to_path_buf();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(resolved)
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

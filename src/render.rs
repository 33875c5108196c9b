use std::sync::OnceLock;

use regex::Regex;

use crate::issues::Issue;

const TITLE_WIDTH: usize = 60;

const PAGE_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <link
      href="https://fonts.googleapis.com/css2?family=Roboto&display=swap"
      rel="stylesheet"
    />
    <link
      href="https://fonts.googleapis.com/css2?family=Secular+One&display=swap"
      rel="stylesheet"
    />
    <style>
      body {
        background-color: #afd0a9;
        font-family: "Roboto", sans-serif;
      }

      h1 {
        text-align: center;
        font-size: 42px;
        font-family: "Secular One", sans-serif;
        color: white;
      }

      table {
        border-spacing: 0px;
        width: 80%;
        margin: auto;
        border-radius: 10px;
        overflow: hidden;
        box-shadow: 5px 5px 10px gray;
      }

      th,
      td {
        text-align: left;
        padding: 12px;
      }

      tr:nth-child(even) {
        background-color: #f2f2f2;
      }

      tr:nth-child(odd) {
        background-color: white;
      }

      tr:hover {
        background-color: #c0c0c0;
      }

      th {
        background-color: #006e58;
        color: white;
        font-size: 18px;
        font-weight: 900;
      }

      a {
        color: #006e58;
      }

      a:hover {
        color: black;
      }
    </style>
    <title>Good First Issues</title>
  </head>
  <body>
    <h1>Good First Issues</h1>
    {table}
  </body>
</html>
"#;

fn bare_url_cell() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<td>(https[^<]+)</td>").expect("valid cell pattern"))
}

/// Wrap every `<td>https…</td>` cell in an anchor that opens a new tab.
///
/// Only cells whose entire content is the URL qualify; cells with padding or
/// other markup are left alone. Already-anchored cells no longer match, so
/// running this twice is harmless.
pub fn annotate_links(html: &str) -> String {
    bare_url_cell()
        .replace_all(html, "<td><a target='_blank' href='${1}'>${1}</a></td>")
        .into_owned()
}

/// Embed a table fragment into the full preview page.
pub fn page(table_html: &str) -> String {
    PAGE_TEMPLATE.replace("{table}", &annotate_links(table_html))
}

/// HTML table with one row per issue. The URL column is emitted as a bare
/// cell so [`annotate_links`] can turn it into a link.
pub fn issues_table(issues: &[Issue]) -> String {
    let mut html = String::from(
        "<table>\n<thead>\n<tr><th>Repository</th><th>Title</th><th>URL</th></tr>\n</thead>\n<tbody>\n",
    );
    for issue in issues {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&issue.repository),
            escape(&issue.title),
            escape(&issue.url),
        ));
    }
    html.push_str("</tbody>\n</table>");
    html
}

/// Plain-text rendering for the terminal.
pub fn text_table(issues: &[Issue]) -> String {
    let rows: Vec<(&str, String, &str)> = issues
        .iter()
        .map(|i| (i.repository.as_str(), truncate(&i.title, TITLE_WIDTH), i.url.as_str()))
        .collect();

    let repo_width = rows
        .iter()
        .map(|(repo, _, _)| repo.chars().count())
        .chain(std::iter::once("Repository".len()))
        .max()
        .unwrap_or(0);
    let title_width = rows
        .iter()
        .map(|(_, title, _)| title.chars().count())
        .chain(std::iter::once("Title".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<rw$}  {:<tw$}  {}\n",
        "Repository",
        "Title",
        "URL",
        rw = repo_width,
        tw = title_width
    );
    for (repo, title, url) in &rows {
        out.push_str(&format!(
            "{:<rw$}  {:<tw$}  {}\n",
            repo,
            title,
            url,
            rw = repo_width,
            tw = title_width
        ));
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(repository: &str, title: &str, url: &str) -> Issue {
        Issue {
            repository: repository.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn annotates_single_cell() {
        assert_eq!(
            annotate_links("<td>https://example.com</td>"),
            "<td><a target='_blank' href='https://example.com'>https://example.com</a></td>"
        );
    }

    #[test]
    fn leaves_input_without_bare_cells_unchanged() {
        let html = "<table><tr><td>plain text</td><td> https://padded.example </td></tr></table>";
        assert_eq!(annotate_links(html), html);
        assert_eq!(annotate_links(""), "");
    }

    #[test]
    fn each_cell_keeps_its_own_url() {
        let html = "<tr><td>https://a.example/1</td><td>https://b.example/2</td></tr>\n\
                    <tr><td>https://c.example/3</td></tr>";
        let out = annotate_links(html);
        assert_eq!(
            out,
            "<tr><td><a target='_blank' href='https://a.example/1'>https://a.example/1</a></td>\
             <td><a target='_blank' href='https://b.example/2'>https://b.example/2</a></td></tr>\n\
             <tr><td><a target='_blank' href='https://c.example/3'>https://c.example/3</a></td></tr>"
        );
    }

    #[test]
    fn second_pass_does_not_double_wrap() {
        let once = annotate_links("<td>https://example.com</td>");
        let twice = annotate_links(&format!("{}<td>https://other.example</td>", once));
        assert_eq!(
            twice,
            "<td><a target='_blank' href='https://example.com'>https://example.com</a></td>\
             <td><a target='_blank' href='https://other.example'>https://other.example</a></td>"
        );
    }

    #[test]
    fn http_urls_are_not_annotated() {
        let html = "<td>http://insecure.example</td>";
        assert_eq!(annotate_links(html), html);
    }

    #[test]
    fn page_embeds_annotated_table() {
        let html = page("<table><tr><td>https://example.com</td></tr></table>");
        assert!(html.contains("<title>Good First Issues</title>"));
        assert!(html.contains("<h1>Good First Issues</h1>"));
        assert!(html.contains("href='https://example.com'"));
        assert!(!html.contains("{table}"));
    }

    #[test]
    fn issues_table_escapes_titles_and_keeps_url_cells_bare() {
        let issues = vec![issue(
            "rust-lang/rust",
            "Fix <b>bold</b> & friends",
            "https://github.com/rust-lang/rust/issues/1",
        )];
        let table = issues_table(&issues);

        assert!(table.contains("<th>Repository</th><th>Title</th><th>URL</th>"));
        assert!(table.contains("<td>Fix &lt;b&gt;bold&lt;/b&gt; &amp; friends</td>"));
        assert!(table.contains("<td>https://github.com/rust-lang/rust/issues/1</td>"));
        assert!(annotate_links(&table)
            .contains("href='https://github.com/rust-lang/rust/issues/1'"));
    }

    #[test]
    fn text_table_aligns_columns() {
        let issues = vec![
            issue("a/b", "Short", "https://github.com/a/b/issues/1"),
            issue("long-owner/long-name", "Longer title", "https://github.com/x/y/issues/2"),
        ];
        let text = text_table(&issues);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        let url_col = lines[0].find("URL").unwrap();
        assert_eq!(lines[1].find("https://").unwrap(), url_col);
        assert_eq!(lines[2].find("https://").unwrap(), url_col);
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "x".repeat(100);
        let cut = truncate(&long, TITLE_WIDTH);
        assert_eq!(cut.chars().count(), TITLE_WIDTH);
        assert!(cut.ends_with('…'));
    }
}

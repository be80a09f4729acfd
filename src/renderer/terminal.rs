//! Terminal presenter - print a live subtree as indented, styled markup.
//!
//! ```text
//! <div id="div-wrapper">
//!   <h1 id="div-test">
//!     1
//!   </h1>
//! </div>
//! ```

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};

use super::document::{Document, NodeKind};
use crate::types::ElementId;

const INDENT: &str = "  ";

/// Write `el` and its subtree to `out`, then flush.
pub fn present(doc: &Document, el: ElementId, out: &mut impl Write) -> io::Result<()> {
    write_node(doc, el, 0, out)?;
    out.flush()
}

fn write_node(doc: &Document, el: ElementId, depth: usize, out: &mut impl Write) -> io::Result<()> {
    let pad = INDENT.repeat(depth);
    match doc.kind(el) {
        Some(NodeKind::Text(text)) => {
            queue!(out, Print(&pad), Print(text), Print("\r\n"))?;
        }
        Some(NodeKind::Element { tag, attrs }) => {
            queue!(out, Print(&pad), Print("<"), PrintStyledContent(tag.as_str().cyan()))?;
            for (name, value) in attrs {
                queue!(
                    out,
                    Print(" "),
                    PrintStyledContent(name.as_str().yellow()),
                    Print("="),
                    PrintStyledContent(format!("\"{}\"", value).green())
                )?;
            }
            queue!(out, Print(">\r\n"))?;

            for &child in doc.children(el) {
                write_node(doc, child, depth + 1, out)?;
            }

            queue!(
                out,
                Print(&pad),
                Print("</"),
                PrintStyledContent(tag.as_str().cyan()),
                Print(">\r\n")
            )?;
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use crate::primitives::h;
    use crate::renderer::mount;

    #[test]
    fn test_present_writes_every_node() {
        let mut doc = Document::new();
        let root = doc.root();
        let mut tree = h(
            "div",
            attrs! { "id" => "div-wrapper" },
            vec![h("span", attrs! { "class" => "span-str" }, "Hello, World")],
        );
        mount(&mut doc, &mut tree, root).unwrap();

        let mut buf = Vec::new();
        present(&doc, root, &mut buf).unwrap();
        let text = String::from_utf8_lossy(&buf);

        assert!(text.contains("Hello, World"));
        assert!(text.contains("div"));
        assert!(text.contains("span-str"));
        assert_eq!(text.matches("\r\n").count(), 7);
    }

    #[test]
    fn test_present_unknown_element_writes_nothing() {
        let doc = Document::new();
        let mut buf = Vec::new();
        present(&doc, ElementId(42), &mut buf).unwrap();
        assert!(buf.is_empty());
    }
}

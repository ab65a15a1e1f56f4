use roxmltree::Node;

const INDENT: &str = "  ";

/// Serialize the tree rooted at `root`, skipping every element tagged
/// `skip_tag` encountered below it. Output carries an XML declaration and
/// 2-space indentation; text-bearing content is kept inline verbatim.
pub(crate) fn serialize_document(root: Node, skip_tag: &str) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(root, 0, skip_tag, &mut out);
    out.push('\n');
    out
}

fn write_element(node: Node, depth: usize, skip_tag: &str, out: &mut String) {
    let name = node.tag_name().name();
    out.push('<');
    out.push_str(name);
    for attr in node.attributes() {
        out.push(' ');
        out.push_str(attr.name());
        out.push_str("=\"");
        push_escaped(attr.value(), true, out);
        out.push('"');
    }

    let children: Vec<Node> = node
        .children()
        .filter(|child| {
            if child.is_element() {
                !child.has_tag_name(skip_tag)
            } else {
                child.is_text() || child.is_comment()
            }
        })
        .collect();

    let has_markup = children.iter().any(|child| !child.is_text());
    let has_text = children
        .iter()
        .any(|child| child.is_text() && !child.text().unwrap_or("").trim().is_empty());

    if has_text {
        // Re-indenting mixed content would alter the document's character
        // data, so it is emitted exactly as parsed.
        out.push('>');
        for child in &children {
            if child.is_text() {
                push_escaped(child.text().unwrap_or(""), false, out);
            } else {
                write_node(*child, depth, skip_tag, out);
            }
        }
        close_tag(name, out);
    } else if has_markup {
        out.push('>');
        for child in children.iter().filter(|child| !child.is_text()) {
            out.push('\n');
            push_indent(depth + 1, out);
            write_node(*child, depth + 1, skip_tag, out);
        }
        out.push('\n');
        push_indent(depth, out);
        close_tag(name, out);
    } else {
        out.push_str("/>");
    }
}

fn write_node(node: Node, depth: usize, skip_tag: &str, out: &mut String) {
    if node.is_comment() {
        out.push_str("<!--");
        out.push_str(node.text().unwrap_or(""));
        out.push_str("-->");
    } else {
        write_element(node, depth, skip_tag, out);
    }
}

fn close_tag(name: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn push_escaped(value: &str, in_attribute: bool, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

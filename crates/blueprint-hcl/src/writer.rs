// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Low-level HCL text construction: indentation, attribute literals per
//! semantic type, and block-literal (heredoc) bodies.

use std::collections::BTreeMap;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Accumulates HCL output. Each nested block adds one indentation level
/// (two spaces); attribute writers format their value per its semantic
/// type: quoted string, bare number, bare boolean, bracketed list, map
/// object, or heredoc.
pub(crate) struct HclWriter {
    out: String,
    depth: usize,
}

impl HclWriter {
    pub fn new() -> Self {
        Self { out: String::new(), depth: 0 }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Opens `header {` and indents subsequent lines one level deeper.
    pub fn open_block(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
    }

    pub fn close_block(&mut self) {
        self.depth -= 1;
        self.line("}");
    }

    /// A quoted string attribute. Values pass through verbatim: embedded
    /// quotes and backslashes are not escaped, matching the editor's
    /// long-standing preview output.
    pub fn attr_str(&mut self, key: &str, value: &str) {
        self.line(&format!("{key} = \"{value}\""));
    }

    /// A bare integer attribute.
    pub fn attr_int(&mut self, key: &str, value: u64) {
        self.line(&format!("{key} = {value}"));
    }

    /// A bare boolean attribute.
    pub fn attr_bool(&mut self, key: &str, value: bool) {
        self.line(&format!("{key} = {value}"));
    }

    /// A bracketed list of quoted strings: `key = ["a", "b"]`.
    pub fn attr_list(&mut self, key: &str, values: &[String]) {
        let mut literal = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                literal.push_str(", ");
            }
            // Same pass-through policy as attr_str.
            write!(literal, "\"{value}\"").unwrap();
        }
        self.line(&format!("{key} = [{literal}]"));
    }

    /// A map literal, one `key = "value"` pair per line, one level deeper
    /// than the enclosing block.
    pub fn attr_map(&mut self, key: &str, map: &BTreeMap<String, String>) {
        self.line(&format!("{key} = {{"));
        self.depth += 1;
        for (k, v) in map {
            self.attr_str(k, v);
        }
        self.depth -= 1;
        self.line("}");
    }

    /// A multi-line script as an indented heredoc. The body goes through
    /// this dedicated branch and is never quote-escaped; `<<-` lets the
    /// terminator and body carry block indentation without changing the
    /// script's own leading whitespace.
    pub fn attr_heredoc(&mut self, key: &str, body: &str) {
        self.line(&format!("{key} = <<-EOF"));
        self.depth += 1;
        for script_line in body.lines() {
            if script_line.is_empty() {
                self.out.push('\n');
            } else {
                self.line(script_line);
            }
        }
        self.depth -= 1;
        self.line("EOF");
    }

    /// A `#` comment line.
    pub fn comment(&mut self, text: &str) {
        self.line(&format!("# {text}"));
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blocks_nest_with_two_space_indent() {
        let mut w = HclWriter::new();
        w.open_block("resource \"aws_instance\" \"example\"");
        w.attr_str("ami", "ami-1");
        w.open_block("root_block_device");
        w.attr_int("volume_size", 8);
        w.close_block();
        w.close_block();
        assert_eq!(
            w.finish(),
            r#"resource "aws_instance" "example" {
  ami = "ami-1"
  root_block_device {
    volume_size = 8
  }
}
"#
        );
    }

    #[test]
    fn map_pairs_indent_one_level_past_the_key() {
        let mut w = HclWriter::new();
        w.open_block("resource \"aws_instance\" \"example\"");
        let mut map = BTreeMap::new();
        map.insert("Name".to_string(), "web".to_string());
        map.insert("owner".to_string(), "alice".to_string());
        w.attr_map("tags", &map);
        w.close_block();
        let text = w.finish();
        assert!(text.contains("  tags = {\n    Name = \"web\"\n    owner = \"alice\"\n  }\n"));
    }

    #[test]
    fn heredoc_preserves_body_lines() {
        let mut w = HclWriter::new();
        w.open_block("resource \"aws_instance\" \"example\"");
        w.attr_heredoc("user_data", "#!/bin/bash\n\nyum update -y");
        w.close_block();
        let text = w.finish();
        assert!(text.contains("  user_data = <<-EOF\n    #!/bin/bash\n\n    yum update -y\n  EOF\n"));
    }

    #[test]
    fn strings_pass_through_unescaped() {
        let mut w = HclWriter::new();
        w.attr_str("description", "say \"hi\"");
        assert_eq!(w.finish(), "description = \"say \"hi\"\"\n");
    }

    #[test]
    fn list_literal_is_comma_joined_and_quoted() {
        let mut w = HclWriter::new();
        w.attr_list("vpc_security_group_ids", &["sg-1".to_string(), "sg-2".to_string()]);
        assert_eq!(
            w.finish(),
            "vpc_security_group_ids = [\"sg-1\", \"sg-2\"]\n"
        );
    }
}

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_note(index: usize, paragraphs: usize) -> String {
    let mut content = format!(
        "---\nid: {index:06}\ntitle: Note number {index}\nkeywords: [bench, scanning, note {index}]\nnocite: \"@knuth84 @lamport94\"\nnext: {:06}\n---\n\n# Note {index}\n\n",
        index + 1
    );
    for p in 0..paragraphs {
        content.push_str(&format!(
            "Paragraph {p} links to [[{:06}]] and cites @doe{p}, see also mailto:someone@example.org.\n\n",
            (index + p) % 1000
        ));
        if p % 5 == 0 {
            content.push_str("```rust\nlet skipped = \"[[not-a-link]]\";\n```\n\n");
        }
        if p % 7 == 0 {
            content.push_str("    [[indented]] verbatim block\n\n");
        }
    }
    content
}

#[allow(dead_code)]
pub fn generate_references(entries: usize) -> String {
    let mut content = String::from("id: bibliography\ntitle: Reading list\nreferences:\n");
    for i in 0..entries {
        content.push_str(&format!("- id: key{i}\n  title: Reference title {i}\n"));
    }
    content
}

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_html_content(size: usize) -> String {
    let base = "<h2>Section</h2>\n<p>Paragraph with <strong>some</strong> content. It has two sentences!</p>\n<ul>\n  <li>Bullet point</li>\n  <li>Parent item<ul><li>Nested item</li></ul></li>\n</ul>\n<p></p>\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_full_document(sections: usize) -> String {
    let mut content = String::from("<!DOCTYPE html><html><head><title>Bench</title></head><body>\n");

    for section in 0..sections {
        content.push_str(&format!("<h1>Chapter {}</h1>\n", section));
        for paragraph in 0..10 {
            content.push_str(&format!(
                "<p>Paragraph {paragraph} of chapter {section}. Dr. Smith arrived at 3.14 pm! \
                 Was it <em>late</em>? Nobody knew &amp; nobody asked.</p>\n"
            ));
        }
    }

    content.push_str("</body></html>\n");
    content
}

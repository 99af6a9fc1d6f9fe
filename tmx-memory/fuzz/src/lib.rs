use arbitrary::Arbitrary;
use quick_xml::escape::escape;
use tmx_memory::variant;

/// Wrapper struct for generating arbitrary translation units.
#[derive(Arbitrary, Debug)]
pub struct Unit {
    pub meta_key: Vec<String>,
    pub source: String,
    pub target: String,
}

/// Generate a TMX document for fuzzing.
pub fn create_document(locale: &str, units: &[Unit]) -> String {
    let mut document = String::from(r#"<tmx version="1.4"><header srclang="en"/><body>"#);
    for unit in units {
        let path = variant::encode("en", &unit.meta_key.join("."));
        document.push_str(&format!(
            r#"<tu><prop type="x-smartling-string-variant">{}</prop><tuv xml:lang="en"><seg>{}</seg></tuv><tuv xml:lang="{locale}"><seg>{}</seg></tuv></tu>"#,
            escape(&path),
            escape(&unit.source),
            escape(&unit.target)
        ));
    }
    document.push_str("</body></tmx>");
    document
}

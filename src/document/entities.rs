/// Decode character references in text and attribute values.
///
/// Contract:
/// - Every named reference of the HTML5 table decodes (`&eacute;`, `&copy;`,
///   `&euro;`, `&rsquo;`, ...).
/// - Numeric references decode in decimal (`&#8217;`) and hex (`&#x2019;`) form.
/// - Unknown names and malformed numerics stay as literal text, so the
///   serializer escapes their `&` like any other ampersand.
pub(crate) fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    html_escape::decode_html_entities(s).into_owned()
}

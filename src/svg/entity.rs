//! General entities declared in a document's internal DTD subset.
//!
//! Editors such as Illustrator declare namespace URIs as entities and refer
//! to them from attributes (`xmlns:x="&ns_extend;"`). Those references are
//! legal XML but mean nothing once the markup is inlined without its
//! DOCTYPE, so they are expanded while the tree is built.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::events::{BytesStart, BytesText};

/// Entities XML predefines. They can't be redeclared to anything else.
const PREDEFINED: [&str; 5] = ["lt", "gt", "amp", "apos", "quot"];

/// Entities that refer to other entities stop expanding past this depth.
const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, Default)]
pub(crate) struct EntityMap {
    entities: HashMap<String, String>,
}

impl EntityMap {
    /// Collects the internal `<!ENTITY name "value">` declarations of a
    /// DOCTYPE body.
    ///
    /// Parameter entities (`<!ENTITY % name ...>`) and external entities
    /// (`SYSTEM`/`PUBLIC`) are skipped. When a name is declared twice the
    /// first declaration binds.
    pub(crate) fn from_doctype(doctype: &str) -> Self {
        let mut entities = HashMap::new();
        let mut rest = doctype;

        while let Some(pos) = rest.find("<!ENTITY") {
            rest = &rest[pos + "<!ENTITY".len()..];
            let decl = rest.trim_start();
            if decl.starts_with('%') {
                continue;
            }

            let name_end = decl.find(char::is_whitespace).unwrap_or(decl.len());
            let name = &decl[..name_end];
            let literal = decl[name_end..].trim_start();

            let quote = literal.chars().next().filter(|c| matches!(*c, '"' | '\''));
            let Some(quote) = quote else {
                continue;
            };
            let Some(len) = literal[1..].find(quote) else {
                continue;
            };

            if !name.is_empty() && !PREDEFINED.contains(&name) {
                entities
                    .entry(name.to_string())
                    .or_insert_with(|| literal[1..1 + len].to_string());
            }
        }

        Self { entities }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Replacement text of a declared entity.
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.entities.get(name).map(String::as_str)
    }

    /// Replaces references to declared entities in escaped markup.
    ///
    /// Predefined entities, character references and undeclared names are
    /// left untouched. Quotes in replacement text are escaped so the result
    /// stays valid inside either kind of attribute quoting.
    pub(crate) fn expand<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        self.expand_at(raw, 0)
    }

    fn expand_at<'a>(&self, raw: &'a str, depth: usize) -> Cow<'a, str> {
        if self.is_empty() || !raw.contains('&') {
            return Cow::Borrowed(raw);
        }

        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        let mut changed = false;

        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let tail = &rest[amp..];
            let Some(semi) = tail.find(';') else {
                out.push_str(tail);
                rest = "";
                break;
            };

            match self.get(&tail[1..semi]) {
                Some(value) if depth < MAX_DEPTH => {
                    let value = self.expand_at(value, depth + 1);
                    out.push_str(&value.replace('"', "&quot;").replace('\'', "&apos;"));
                    changed = true;
                }
                _ => out.push_str(&tail[..=semi]),
            }
            rest = &tail[semi + 1..];
        }
        out.push_str(rest);

        if changed { Cow::Owned(out) } else { Cow::Borrowed(raw) }
    }

    /// Expands entity references inside the attribute values of a start tag.
    ///
    /// Names can't contain `&`, so every reference in the tag sits inside an
    /// attribute value and the raw tag can be rewritten in place. Untouched
    /// tags keep their original bytes.
    pub(crate) fn expand_start(&self, start: BytesStart<'_>) -> BytesStart<'static> {
        let name_len = start.name().as_ref().len();
        let expanded = match self.expand(&String::from_utf8_lossy(&start)) {
            Cow::Owned(expanded) => Some(expanded),
            Cow::Borrowed(_) => None,
        };

        match expanded {
            Some(content) => BytesStart::from_content(content, name_len),
            None => start.into_owned(),
        }
    }

    /// Expands entity references inside escaped text.
    pub(crate) fn expand_text(&self, text: BytesText<'_>) -> BytesText<'static> {
        let expanded = match self.expand(&String::from_utf8_lossy(&text)) {
            Cow::Owned(expanded) => Some(expanded),
            Cow::Borrowed(_) => None,
        };

        match expanded {
            Some(content) => BytesText::from_escaped(content),
            None => text.into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCTYPE: &str = r#"svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd" [
	<!ENTITY ns_svg "http://www.w3.org/2000/svg">
	<!ENTITY ns_xlink 'http://www.w3.org/1999/xlink'>
	<!ENTITY % param "ignored">
	<!ENTITY external SYSTEM "external.ent">
	<!ENTITY ns_svg "redeclared">
	<!ENTITY quoted 'say "hi"'>
	<!ENTITY nested "see &ns_svg;">
	<!ENTITY amp "&#38;">
]"#;

    #[test]
    fn collects_internal_general_entities() {
        let entities = EntityMap::from_doctype(DOCTYPE);

        assert_eq!(entities.get("ns_svg"), Some("http://www.w3.org/2000/svg"));
        assert_eq!(entities.get("ns_xlink"), Some("http://www.w3.org/1999/xlink"));
        assert_eq!(entities.get("param"), None);
        assert_eq!(entities.get("external"), None);
        assert_eq!(entities.get("amp"), None);
    }

    #[test]
    fn expands_declared_references_only() {
        let entities = EntityMap::from_doctype(DOCTYPE);

        assert_eq!(
            entities.expand("a &ns_svg; &amp; &#169; &unknown; b"),
            "a http://www.w3.org/2000/svg &amp; &#169; &unknown; b"
        );
        assert_eq!(entities.expand("&nested;"), "see http://www.w3.org/2000/svg");
        assert_eq!(entities.expand("&quoted;"), "say &quot;hi&quot;");
    }

    #[test]
    fn untouched_markup_is_borrowed() {
        let entities = EntityMap::from_doctype(DOCTYPE);
        assert!(matches!(entities.expand("plain &amp; text"), Cow::Borrowed(_)));
        assert!(matches!(EntityMap::default().expand("&ns_svg;"), Cow::Borrowed(_)));
    }

    #[test]
    fn self_reference_terminates() {
        let entities = EntityMap::from_doctype(r#"x [<!ENTITY loop "&loop;">]"#);
        assert_eq!(entities.expand("&loop;"), "&loop;");
    }

    #[test]
    fn expands_start_tags() {
        let entities = EntityMap::from_doctype(DOCTYPE);
        let start = BytesStart::from_content(r#"use xmlns:xlink='&ns_xlink;' x="1""#, 3);
        let expanded = entities.expand_start(start);

        assert_eq!(expanded.name().as_ref(), b"use");
        assert_eq!(
            &*expanded,
            br#"use xmlns:xlink='http://www.w3.org/1999/xlink' x="1""#.as_slice()
        );
    }
}

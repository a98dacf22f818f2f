//! Finds `import <Name> from 0x<hex>` references in source text.
//!
//! Scanning only reports matches; it never edits. The rewrite engine decides what to do
//! with each one, so an unresolved match is left byte-for-byte as it was.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

static IMPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"import\s+([A-Za-z_][A-Za-z0-9_]*)\s+from\s+0x([A-Fa-f0-9]+)")
        .expect("import pattern is valid")
});

/// One address-import reference found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef<'t> {
    /// The whole `import Name from 0xABC` span.
    pub span: Range<usize>,
    /// The identifier being imported.
    pub name: &'t str,
    /// The hex digits after `0x`. Only this range is ever replaced.
    pub address: Range<usize>,
}

impl<'t> ImportRef<'t> {
    /// The current address digits, exactly as written.
    pub fn address_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.address.clone()]
    }
}

/// Lazy, left-to-right iterator over non-overlapping import references.
pub struct ImportRefs<'r, 't> {
    inner: CaptureMatches<'r, 't>,
}

impl<'r, 't> Iterator for ImportRefs<'r, 't> {
    type Item = ImportRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = self.inner.next()?;
            // Both groups are mandatory in the pattern.
            let (Some(whole), Some(name), Some(address)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            return Some(ImportRef {
                span: whole.range(),
                name: name.as_str(),
                address: address.range(),
            });
        }
    }
}

/// Scan `text` for import references.
pub fn scan_imports(text: &str) -> ImportRefs<'static, '_> {
    ImportRefs { inner: IMPORT_PATTERN.captures_iter(text) }
}

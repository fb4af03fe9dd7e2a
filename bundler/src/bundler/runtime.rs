//! Loader runtime emission and key formatting.
//!
//! The runtime is generated code, not executed here: it implements cached,
//! cycle-safe, on-demand module instantiation inside the artifact. A cache
//! entry is stored *before* the module body runs, so a circular `require`
//! observes the in-progress exports object instead of recursing.

use std::path::Path;

pub const OUTPUT_FILE_NAME: &str = "bundle.js";

/// The single key formatter, used for table keys, rewritten `require()`
/// arguments and the entry key alike. Keys are `./`-prefixed and
/// `/`-separated regardless of platform.
pub fn module_key(path: &Path) -> String {
    let joined: Vec<String> = path
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("./{}", joined.join("/"))
}

/// Formats `value` as a JavaScript double-quoted string literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Wraps the serialized module table and the entry key in the bootstrap.
pub fn emit(module_table: &str, entry_key: &str) -> String {
    format!(
        "const modules = {module_table};
const entry = {entry};

function startBundle(modules, entry) {{
  const moduleCache = {{}};

  const require = moduleName => {{
    // A cache entry may still be mid-initialization; returning it as-is is
    // what keeps circular requires from looping forever.
    if (moduleCache[moduleName]) {{
      return moduleCache[moduleName];
    }}
    const exports = {{}};
    moduleCache[moduleName] = exports;
    modules[moduleName](exports, require);
    return moduleCache[moduleName];
  }};

  require(entry);
}}

startBundle(modules, entry);
",
        entry = js_string(entry_key),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_key_is_dot_slash_prefixed() {
        assert_eq!(module_key(Path::new("main.js")), "./main.js");
        assert_eq!(module_key(Path::new("demo/a.js")), "./demo/a.js");
    }

    #[test]
    fn js_string_escapes_quotes_and_backslashes() {
        assert_eq!(js_string("a.js"), "\"a.js\"");
        assert_eq!(js_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}

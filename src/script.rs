//! Reader and writer for the game's `module { item { key = value, } }` script
//! format, as used by the clothing definitions under `media/scripts`.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use tracing::{debug, info};

/// Every parsed item ends up under this module name.
pub const BASE_MODULE: &str = "Base";

/// Small insertion-ordered map keyed by name.
///
/// Script files hold a handful of entries, so lookups are linear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Replace the value of an existing key in place, or append a new entry.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if let Some(existing) = self.get_mut(&key) {
            *existing = value;
            return;
        }
        self.entries.push((key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries
            .iter_mut()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

/// Property name -> raw value text.
pub type Properties = OrderedMap<String>;
/// Item name -> properties.
pub type Items = OrderedMap<Properties>;
/// Module name -> items.
pub type Script = OrderedMap<Items>;

/// Read and parse a script file.
pub fn read(path: &Utf8Path) -> Result<Script> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading script {path}"))?;
    parse(&raw).with_context(|| format!("parsing script {path}"))
}

/// Parse script text.
///
/// Items of every module are collected under [`BASE_MODULE`]; a later module
/// replaces the items of an earlier one. `\r\n` and lone `\r` line endings
/// are read as `\n`.
pub fn parse(text: &str) -> Result<Script> {
    let text = normalize_newlines(text);
    let mut script = Script::new();
    for module in text.split("module ").skip(1) {
        let mut items = Items::new();
        for item in module.split("item ").skip(1) {
            let Some((name, block)) = item.split_once('{') else {
                bail!("item `{}` has no property block", item.trim());
            };
            items.insert(name.trim(), parse_properties(block));
        }
        script.insert(BASE_MODULE, items);
    }
    Ok(script)
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn parse_properties(block: &str) -> Properties {
    let mut properties = Properties::new();
    // Whatever follows the last comma is the closing brace(s).
    let Some((body, _)) = block.rsplit_once(',') else {
        return properties;
    };

    for fragment in body.split(',') {
        let pair = fragment.trim();
        if let Some((key, value)) = split_pair(pair) {
            properties.insert(key, value.to_owned());
            continue;
        }

        // Some shipped scripts end a few entries with `;` instead of `,`.
        debug!("malformed property {pair:?}");
        for piece in pair.split(";\n") {
            match split_pair(piece) {
                Some((key, value)) => {
                    debug!("recovered property `{key}`");
                    properties.insert(key, value.to_owned());
                }
                None => debug!("skipping {piece:?}"),
            }
        }
    }
    properties
}

/// Split `key = value`, requiring exactly one `=`.
fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let mut parts = pair.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Some((key.trim(), value.trim())),
        _ => None,
    }
}

/// Render a script in the layout the game ships.
pub fn render(script: &Script) -> String {
    let mut out = String::new();
    for (module, items) in script.iter() {
        let _ = write!(out, "module {module}\n{{\n");
        for (item, properties) in items.iter() {
            let _ = write!(out, "\titem {item}\n\t{{\n");
            for (key, value) in properties.iter() {
                let _ = writeln!(out, "\t\t{key} = {value},");
            }
            out.push_str("\t}\n");
        }
        out.push_str("}\n");
    }
    out
}

/// Overwrite `path` with the rendered script.
pub fn write(script: &Script, path: &Utf8Path) -> Result<()> {
    info!("writing {path}");
    fs::write(path, render(script)).with_context(|| format!("writing script {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unique_utf8_temp_dir;

    const JEANS: &str = "module Test\n{\n\titem Jeans\n\t{\n\t\tColor = Blue,\n\t}\n}\n";

    fn props(script: &Script, item: &str) -> Vec<(String, String)> {
        script
            .get(BASE_MODULE)
            .and_then(|items| items.get(item))
            .map(|p| p.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect())
            .unwrap_or_default()
    }

    #[test]
    fn parses_single_item_under_base() {
        let script = parse(JEANS).unwrap();
        assert_eq!(script.keys().collect::<Vec<_>>(), vec!["Base"]);
        assert_eq!(
            props(&script, "Jeans"),
            vec![("Color".to_owned(), "Blue".to_owned())]
        );
    }

    #[test]
    fn renders_in_game_layout() {
        let mut script = parse(JEANS).unwrap();
        script
            .get_mut(BASE_MODULE)
            .and_then(|items| items.get_mut("Jeans"))
            .unwrap()
            .insert("Insulation", "1.0".to_owned());

        assert_eq!(
            render(&script),
            "module Base\n{\n\titem Jeans\n\t{\n\t\tColor = Blue,\n\t\tInsulation = 1.0,\n\t}\n}\n"
        );
    }

    #[test]
    fn keeps_property_and_item_order() {
        let text = "module Base\n{\n\
            \titem Shirt\n\t{\n\t\tType = Clothing,\n\t\tDisplayName = Shirt,\n\t\tWeight = 0.2,\n\t}\n\
            \titem Hat\n\t{\n\t\tZeta = 1,\n\t\tAlpha = 2,\n\t}\n}\n";
        let script = parse(text).unwrap();
        let items = script.get(BASE_MODULE).unwrap();
        assert_eq!(items.keys().collect::<Vec<_>>(), vec!["Shirt", "Hat"]);
        assert_eq!(
            items.get("Shirt").unwrap().keys().collect::<Vec<_>>(),
            vec!["Type", "DisplayName", "Weight"]
        );
        assert_eq!(
            items.get("Hat").unwrap().keys().collect::<Vec<_>>(),
            vec!["Zeta", "Alpha"]
        );
        assert_eq!(render(&script), text);
    }

    #[test]
    fn recovers_semicolon_separated_entries() {
        let text = "module Base\n{\n\titem Boots\n\t{\n\
            \t\tType = Clothing,\n\
            \t\tBodyLocation = Shoes;\n\
            \t\tBloodLocation = Shoes,\n\
            \t\tWeight = 1.5,\n\t}\n}\n";
        let script = parse(text).unwrap();
        assert_eq!(
            props(&script, "Boots"),
            vec![
                ("Type".to_owned(), "Clothing".to_owned()),
                ("BodyLocation".to_owned(), "Shoes".to_owned()),
                ("BloodLocation".to_owned(), "Shoes".to_owned()),
                ("Weight".to_owned(), "1.5".to_owned()),
            ]
        );
    }

    #[test]
    fn recovers_semicolon_entries_with_crlf() {
        let text = "module Base\r\n{\r\n\titem Boots\r\n\t{\r\n\
            \t\tType = Clothing,\r\n\
            \t\tBodyLocation = Shoes;\r\n\
            \t\tBloodLocation = Shoes,\r\n\
            \t\tWeight = 1.5,\r\n\t}\r\n}\r\n";
        let script = parse(text).unwrap();
        assert_eq!(
            props(&script, "Boots"),
            vec![
                ("Type".to_owned(), "Clothing".to_owned()),
                ("BodyLocation".to_owned(), "Shoes".to_owned()),
                ("BloodLocation".to_owned(), "Shoes".to_owned()),
                ("Weight".to_owned(), "1.5".to_owned()),
            ]
        );
    }

    #[test]
    fn crlf_file_keeps_every_property_on_rewrite() {
        let dir = unique_utf8_temp_dir("crlf");
        let path = dir.join("clothing_boots.txt");
        fs::write(
            path.as_std_path(),
            "module Base\r\n{\r\n\titem Boots\r\n\t{\r\n\
             \t\tBodyLocation = Shoes;\r\n\
             \t\tWeight = 1.5,\r\n\t}\r\n}\r\n",
        )
        .unwrap();

        let script = read(&path).unwrap();
        write(&script, &path).unwrap();
        assert_eq!(
            fs::read_to_string(path.as_std_path()).unwrap(),
            "module Base\n{\n\titem Boots\n\t{\n\t\tBodyLocation = Shoes,\n\t\tWeight = 1.5,\n\t}\n}\n"
        );

        let _ = fs::remove_dir_all(dir.as_std_path());
    }

    #[test]
    fn drops_unrecoverable_fragments() {
        let text = "module Base\n{\n\titem Odd\n\t{\n\
            \t\tGood = yes,\n\
            \t\tno separator here,\n\
            \t\tTwice = a = b,\n\
            \t\tAlsoGood = 2,\n\t}\n}\n";
        let script = parse(text).unwrap();
        assert_eq!(
            props(&script, "Odd"),
            vec![
                ("Good".to_owned(), "yes".to_owned()),
                ("AlsoGood".to_owned(), "2".to_owned()),
            ]
        );
    }

    #[test]
    fn entry_after_last_comma_is_dropped() {
        let text = "module Base { item Cap { A = 1, B = 2 } }";
        let script = parse(text).unwrap();
        assert_eq!(props(&script, "Cap"), vec![("A".to_owned(), "1".to_owned())]);
    }

    #[test]
    fn last_module_wins() {
        let text = "module One { item A { X = 1, } }\nmodule Two { item B { Y = 2, } }";
        let script = parse(text).unwrap();
        assert_eq!(script.len(), 1);
        let items = script.get(BASE_MODULE).unwrap();
        assert_eq!(items.keys().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn text_without_modules_is_empty() {
        assert!(parse("imports { Base }\n").unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn item_without_block_is_an_error() {
        let err = parse("module Base { item Broken }").unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = Properties::new();
        map.insert("a", "1".to_owned());
        map.insert("b", "2".to_owned());
        map.insert("a", "3".to_owned());
        assert_eq!(
            map.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>(),
            vec!["a=3", "b=2"]
        );
    }
}

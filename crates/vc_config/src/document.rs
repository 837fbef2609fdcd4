use core::ops::{Deref, DerefMut};
use std::fs;
use std::path::Path;

use serde_core::Serialize;
use serde_json::ser::PrettyFormatter;
use vc_tree::serde::is_tagged;
use vc_tree::{DeserializeDriver, PlainValue, SerializeDriver, TYPE_KEY};
use vc_tree::{Section, TypeRegistryArc, Value};

use crate::{ConfigError, ConfigOptions};

// -----------------------------------------------------------------------------
// ConfigDocument

/// A configuration stored as a JSON object.
///
/// The document dereferences to its root [`Section`], so values are read and
/// written by path. Rich objects are rebuilt through the document's
/// [`TypeRegistryArc`], the [global](TypeRegistryArc::global) one unless
/// another is given.
///
/// # Examples
///
/// ```
/// use vc_config::ConfigDocument;
///
/// let mut config = ConfigDocument::new();
/// config.set("server.port", 25565);
/// config.set("server.motd", "hello");
///
/// let text = config.save_to_string().unwrap();
///
/// let mut loaded = ConfigDocument::new();
/// loaded.load_from_str(&text).unwrap();
/// assert_eq!(loaded.get_i64("server.port"), Some(25565));
/// assert_eq!(loaded.get_str("server.motd"), Some("hello"));
/// ```
#[derive(Debug)]
pub struct ConfigDocument {
    root: Section,
    options: ConfigOptions,
    registry: TypeRegistryArc,
}

impl Default for ConfigDocument {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigDocument {
    /// Creates an empty document with default options.
    #[inline]
    pub fn new() -> Self {
        Self::with_options(ConfigOptions::new())
    }

    /// Creates an empty document.
    pub fn with_options(options: ConfigOptions) -> Self {
        Self {
            root: Section::with_separator(options.get_path_separator()),
            options,
            registry: TypeRegistryArc::global().clone(),
        }
    }

    /// Uses `registry` to rebuild rich objects.
    #[inline]
    pub fn with_registry(mut self, registry: TypeRegistryArc) -> Self {
        self.registry = registry;
        self
    }

    /// Creates a document loaded from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut document = Self::new();
        document.load(path)?;
        Ok(document)
    }

    #[inline]
    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    /// Changes the options; sections already present keep their separator.
    #[inline]
    pub fn set_options(&mut self, options: ConfigOptions) {
        self.options = options;
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    #[inline]
    pub fn root(&self) -> &Section {
        &self.root
    }

    #[inline]
    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    #[inline]
    pub fn into_root(self) -> Section {
        self.root
    }

    /// Writes the document as JSON.
    ///
    /// Pretty printed with the configured indent, or on one line if it is `0`.
    pub fn save_to_string(&self) -> Result<String, ConfigError> {
        let driver = SerializeDriver::with_policy(self.options.get_entry_failure_policy());
        let plain = PlainValue::Map(driver.serialize_section(&self.root));

        let mut buffer = Vec::new();
        match self.options.get_indent() {
            0 => serde_json::to_writer(&mut buffer, &plain)?,
            indent => {
                let indent = " ".repeat(indent);
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
                plain.serialize(&mut serializer)?;
            }
        }
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Replaces the content with the JSON object in `text`.
    ///
    /// Blank text empties the document. On error the content is unchanged.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Syntax`] if `text` is not JSON.
    /// - [`ConfigError::NotAnObject`] if the top level is not an object.
    /// - [`ConfigError::TopLevelObject`] if the top level is a serialized object.
    /// - [`ConfigError::Serialization`] if an object cannot be rebuilt and
    ///   loading is not set to continue on errors.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        if text.trim().is_empty() {
            self.root.clear();
            return Ok(());
        }

        let map = match serde_json::from_str::<PlainValue>(text)? {
            PlainValue::Map(map) => map,
            other => return Err(ConfigError::NotAnObject(other.kind_name())),
        };
        if is_tagged(&map) {
            let alias = match &map[TYPE_KEY] {
                PlainValue::String(alias) => alias.clone(),
                other => other.kind_name().to_owned(),
            };
            return Err(ConfigError::TopLevelObject { alias });
        }

        let value = {
            let registry = self.registry.read();
            DeserializeDriver::new(&registry)
                .continue_on_error(self.options.get_continue_on_serialization_error())
                .deserialize(map)?
        };
        match value {
            Value::Map(map) => {
                self.root = Section::from_map(map, self.options.get_path_separator());
                Ok(())
            }
            other => Err(ConfigError::NotAnObject(other.kind_name())),
        }
    }

    /// Saves to a file, creating missing parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = self.save_to_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        log::debug!("saved configuration to `{}`", path.display());
        Ok(())
    }

    /// Loads from a file, see [`load_from_str`](Self::load_from_str).
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        self.load_from_str(&text)?;
        log::debug!("loaded configuration from `{}`", path.display());
        Ok(())
    }
}

impl Deref for ConfigDocument {
    type Target = Section;

    #[inline]
    fn deref(&self) -> &Section {
        &self.root
    }
}

impl DerefMut for ConfigDocument {
    #[inline]
    fn deref_mut(&mut self) -> &mut Section {
        &mut self.root
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use vc_tree::{Atom, AtomSet, ConfigSerializable, Fields, ReconstructError, SerializeError};
    use vc_tree::{EntryFailurePolicy, TypeRegistry, TypeRegistryArc, Value};

    use super::ConfigDocument;
    use crate::{ConfigError, ConfigOptions};

    #[derive(Clone, Debug, PartialEq)]
    struct Reward {
        item: String,
        rating: f32,
    }

    impl ConfigSerializable for Reward {
        const ALIAS: &'static str = "Reward";

        fn export_fields(&self) -> Result<Fields, SerializeError> {
            Ok(Fields::new()
                .with("item", self.item.as_str())
                .with("rating", self.rating))
        }

        fn from_fields(fields: &Fields) -> Result<Self, ReconstructError> {
            Ok(Reward {
                item: fields.get("item")?,
                rating: fields.get("rating")?,
            })
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Broken;

    impl ConfigSerializable for Broken {
        const ALIAS: &'static str = "Broken";

        fn export_fields(&self) -> Result<Fields, SerializeError> {
            Err(SerializeError::custom("nope"))
        }

        fn from_fields(_: &Fields) -> Result<Self, ReconstructError> {
            Ok(Broken)
        }
    }

    fn registry() -> TypeRegistryArc {
        let mut registry = TypeRegistry::new();
        registry.register::<Reward>();
        TypeRegistryArc::new(registry)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("vc_config_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn save_and_load_string() {
        let mut config = ConfigDocument::new().with_registry(registry());
        config.set("a.b", 1);
        config.set("list", vec![Value::from("x"), Value::from(2.5)]);
        config.set(
            "reward",
            Value::object(Reward {
                item: "gravel".into(),
                rating: 2.34,
            }),
        );
        let tags: AtomSet = [Atom::from("t")].into_iter().collect();
        config.set("tags", tags.clone());

        let text = config.save_to_string().unwrap();

        let mut loaded = ConfigDocument::new().with_registry(registry());
        loaded.load_from_str(&text).unwrap();
        assert_eq!(loaded.root(), config.root());
        assert!(loaded.section("a").is_some());
        assert_eq!(
            loaded.get_object::<Reward>("reward").map(|r| r.item.as_str()),
            Some("gravel")
        );
        assert_eq!(loaded.get("tags"), Some(&Value::Set(tags)));
    }

    #[test]
    fn indent() {
        let mut config = ConfigDocument::new();
        config.set("a", 1);
        assert_eq!(config.save_to_string().unwrap(), "{\n  \"a\": 1\n}");

        config.set_options(ConfigOptions::new().indent(4));
        assert_eq!(config.save_to_string().unwrap(), "{\n    \"a\": 1\n}");

        config.set_options(ConfigOptions::new().indent(0));
        assert_eq!(config.save_to_string().unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn empty_document() {
        let config = ConfigDocument::new();
        assert_eq!(config.save_to_string().unwrap(), "{}");

        let mut config = ConfigDocument::new();
        config.set("x", 1);
        config.load_from_str("  \n").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn top_level_validation() {
        let mut config = ConfigDocument::new();
        config.set("kept", true);

        assert!(matches!(
            config.load_from_str("[1, 2]"),
            Err(ConfigError::NotAnObject("list"))
        ));
        assert!(matches!(
            config.load_from_str(r#"{"__type__": "Set", "values": []}"#),
            Err(ConfigError::TopLevelObject { alias }) if alias == "Set"
        ));
        assert!(matches!(
            config.load_from_str("{"),
            Err(ConfigError::Syntax(_))
        ));
        assert_eq!(config.get_bool("kept"), Some(true));
    }

    #[test]
    fn continue_on_error_load() {
        let text = r#"{"bad": {"__type__": "Unknown"}, "good": 1}"#;

        let mut strict = ConfigDocument::new().with_registry(registry());
        let err = strict.load_from_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
        assert_eq!(err.to_string(), "specified type does not exist: `Unknown`");

        let options = ConfigOptions::new().continue_on_serialization_error(true);
        let mut lenient = ConfigDocument::with_options(options).with_registry(registry());
        lenient.load_from_str(text).unwrap();
        assert_eq!(lenient.get("bad"), Some(&Value::Null));
        assert_eq!(lenient.get_i64("good"), Some(1));
    }

    #[test]
    fn custom_separator() {
        let mut config = ConfigDocument::with_options(ConfigOptions::new().path_separator('/'));
        config.load_from_str(r#"{"a.b": {"c": 1}}"#).unwrap();
        assert_eq!(config.get_i64("a.b/c"), Some(1));
    }

    #[test]
    fn failure_policy_on_save() {
        let mut config = ConfigDocument::new();
        config.set("list", vec![Value::from(1), Value::object(Broken), Value::from(3)]);
        assert_eq!(
            config.save_to_string().unwrap(),
            "{\n  \"list\": [\n    1,\n    3\n  ]\n}"
        );

        let options = ConfigOptions::new()
            .indent(0)
            .entry_failure_policy(EntryFailurePolicy::Truncate);
        config.set_options(options);
        assert_eq!(config.save_to_string().unwrap(), r#"{"list":[1]}"#);
    }

    #[test]
    fn save_and_load_file() {
        let path = temp_path("nested/config.json");
        let mut config = ConfigDocument::new();
        config.set("server.port", 25565);
        config.save(&path).unwrap();

        let loaded = ConfigDocument::from_path(&path).unwrap();
        assert_eq!(loaded.get_i64("server.port"), Some(25565));

        let missing = ConfigDocument::from_path(temp_path("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let _ = std::fs::remove_dir_all(path.parent().unwrap().parent().unwrap());
    }
}

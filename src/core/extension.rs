//! Language extensions - per-language compile settings attached to a source set.
//!
//! Each supported language has a fixed schema. The host delivers the payload
//! keyed by language name; it is materialized into one of the variants of
//! [`LanguageExtension`] so that the differ can enumerate fields explicitly.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language the graph knows how to model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Antlr,
    Java,
    Scala,
    Groovy,
    Kotlin,
}

impl Language {
    /// All supported languages, in canonical order.
    pub const ALL: [Language; 5] = [
        Language::Antlr,
        Language::Java,
        Language::Scala,
        Language::Groovy,
        Language::Kotlin,
    ];

    /// The canonical lowercase name used as the extension map key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Antlr => "antlr",
            Language::Java => "java",
            Language::Scala => "scala",
            Language::Groovy => "groovy",
            Language::Kotlin => "kotlin",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported language: {}", s))
    }
}

/// The set of languages a client asked for.
///
/// `None` means every supported language is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageFilter {
    enabled: Option<BTreeSet<Language>>,
}

impl LanguageFilter {
    /// Enable every supported language.
    pub fn all() -> Self {
        LanguageFilter { enabled: None }
    }

    /// Enable only the given languages.
    pub fn only(languages: impl IntoIterator<Item = Language>) -> Self {
        LanguageFilter {
            enabled: Some(languages.into_iter().collect()),
        }
    }

    /// Check whether extensions for `language` should be kept.
    pub fn allows(&self, language: Language) -> bool {
        match &self.enabled {
            Some(set) => set.contains(&language),
            None => true,
        }
    }
}

/// Settings shared by every language's compile step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileSettings {
    pub source_dirs: BTreeSet<PathBuf>,
    pub generated_source_dirs: BTreeSet<PathBuf>,
    pub classes_dir: Option<PathBuf>,
    pub compile_task_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JavaExtension {
    #[serde(flatten)]
    pub compile: CompileSettings,
    pub java_home: Option<PathBuf>,
    pub java_version: Option<String>,
    pub source_compatibility: Option<String>,
    pub target_compatibility: Option<String>,
    pub compiler_args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScalaExtension {
    #[serde(flatten)]
    pub compile: CompileSettings,
    pub scala_compiler_args: Vec<String>,
    pub scala_organization: Option<String>,
    pub scala_version: Option<String>,
    pub scala_binary_version: Option<String>,
    pub scala_jars: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroovyExtension {
    #[serde(flatten)]
    pub compile: CompileSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KotlinExtension {
    #[serde(flatten)]
    pub compile: CompileSettings,
    pub kotlin_language_version: Option<String>,
    pub kotlin_api_version: Option<String>,
    pub kotlinc_options: Vec<String>,
    pub kotlin_associates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AntlrExtension {
    #[serde(flatten)]
    pub compile: CompileSettings,
}

/// A language extension with its fixed, per-language schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LanguageExtension {
    Antlr(AntlrExtension),
    Java(JavaExtension),
    Scala(ScalaExtension),
    Groovy(GroovyExtension),
    Kotlin(KotlinExtension),
}

impl LanguageExtension {
    /// Materialize a host payload for `language` into its fixed schema.
    pub fn from_payload(
        language: Language,
        payload: &serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let payload = payload.clone();
        Ok(match language {
            Language::Antlr => LanguageExtension::Antlr(serde_json::from_value(payload)?),
            Language::Java => LanguageExtension::Java(serde_json::from_value(payload)?),
            Language::Scala => LanguageExtension::Scala(serde_json::from_value(payload)?),
            Language::Groovy => LanguageExtension::Groovy(serde_json::from_value(payload)?),
            Language::Kotlin => LanguageExtension::Kotlin(serde_json::from_value(payload)?),
        })
    }

    /// The language this extension belongs to.
    pub fn language(&self) -> Language {
        match self {
            LanguageExtension::Antlr(_) => Language::Antlr,
            LanguageExtension::Java(_) => Language::Java,
            LanguageExtension::Scala(_) => Language::Scala,
            LanguageExtension::Groovy(_) => Language::Groovy,
            LanguageExtension::Kotlin(_) => Language::Kotlin,
        }
    }

    /// Settings common to every language.
    pub fn compile(&self) -> &CompileSettings {
        match self {
            LanguageExtension::Antlr(ext) => &ext.compile,
            LanguageExtension::Java(ext) => &ext.compile,
            LanguageExtension::Scala(ext) => &ext.compile,
            LanguageExtension::Groovy(ext) => &ext.compile,
            LanguageExtension::Kotlin(ext) => &ext.compile,
        }
    }

    pub fn as_java(&self) -> Option<&JavaExtension> {
        match self {
            LanguageExtension::Java(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn as_scala(&self) -> Option<&ScalaExtension> {
        match self {
            LanguageExtension::Scala(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn as_kotlin(&self) -> Option<&KotlinExtension> {
        match self {
            LanguageExtension::Kotlin(ext) => Some(ext),
            _ => None,
        }
    }
}

impl From<JavaExtension> for LanguageExtension {
    fn from(ext: JavaExtension) -> Self {
        LanguageExtension::Java(ext)
    }
}

impl From<ScalaExtension> for LanguageExtension {
    fn from(ext: ScalaExtension) -> Self {
        LanguageExtension::Scala(ext)
    }
}

impl From<KotlinExtension> for LanguageExtension {
    fn from(ext: KotlinExtension) -> Self {
        LanguageExtension::Kotlin(ext)
    }
}

impl From<GroovyExtension> for LanguageExtension {
    fn from(ext: GroovyExtension) -> Self {
        LanguageExtension::Groovy(ext)
    }
}

impl From<AntlrExtension> for LanguageExtension {
    fn from(ext: AntlrExtension) -> Self {
        LanguageExtension::Antlr(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("java".parse::<Language>(), Ok(Language::Java));
        assert_eq!("Kotlin".parse::<Language>(), Ok(Language::Kotlin));
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_filter() {
        let all = LanguageFilter::all();
        assert!(all.allows(Language::Scala));

        let only_java = LanguageFilter::only([Language::Java]);
        assert!(only_java.allows(Language::Java));
        assert!(!only_java.allows(Language::Scala));
    }

    #[test]
    fn test_java_payload() {
        let payload = serde_json::json!({
            "sourceDirs": ["/p/src/main/java"],
            "classesDir": "/p/out/main",
            "javaVersion": "17",
            "sourceCompatibility": "17",
            "compilerArgs": ["-parameters"]
        });

        let ext = LanguageExtension::from_payload(Language::Java, &payload).unwrap();
        assert_eq!(ext.language(), Language::Java);
        assert_eq!(ext.compile().classes_dir, Some(PathBuf::from("/p/out/main")));

        let java = ext.as_java().unwrap();
        assert_eq!(java.java_version.as_deref(), Some("17"));
        assert_eq!(java.compiler_args, vec!["-parameters"]);
        assert!(java.target_compatibility.is_none());
    }

    #[test]
    fn test_malformed_payload() {
        let payload = serde_json::json!({ "scalaJars": "not-a-list" });
        assert!(LanguageExtension::from_payload(Language::Scala, &payload).is_err());
    }
}

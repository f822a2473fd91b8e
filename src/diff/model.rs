//! Field lists of the source-set model.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{
    AntlrExtension, Artifact, CompileSettings, GroovyExtension, JavaExtension, KotlinExtension,
    Language, LanguageExtension, ModuleDependency, RunTask, ScalaExtension, SourceSet, SourceSetId,
};
use crate::diff::{changed, compare, Change, Diff, FieldChange};

impl Diff for Language {
    fn describe(&self) -> String {
        self.as_str().to_string()
    }
}

impl Diff for SourceSetId {
    fn describe(&self) -> String {
        self.to_string()
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        changed([
            compare("projectDir", &self.project_dir().to_path_buf(), &new.project_dir().to_path_buf()),
            compare(
                "sourceSetName",
                &self.source_set_name().to_string(),
                &new.source_set_name().to_string(),
            ),
        ])
    }
}

impl Diff for Artifact {
    fn describe(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!("{} ({})", self.uri, classifier),
            None => self.uri.clone(),
        }
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        changed([
            compare("uri", &self.uri, &new.uri),
            compare("classifier", &self.classifier, &new.classifier),
        ])
    }
}

impl Diff for ModuleDependency {
    fn describe(&self) -> String {
        self.coordinates()
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        changed([
            compare("group", &self.group, &new.group),
            compare("module", &self.module, &new.module),
            compare("version", &self.version, &new.version),
            compare("artifacts", &self.artifacts, &new.artifacts),
        ])
    }
}

impl Diff for RunTask {
    fn describe(&self) -> String {
        self.task_path.clone()
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        changed([
            compare("taskPath", &self.task_path, &new.task_path),
            compare("classpath", &self.classpath, &new.classpath),
            compare("jvmOptions", &self.jvm_options, &new.jvm_options),
            compare("workingDirectory", &self.working_directory, &new.working_directory),
            compare(
                "environmentVariables",
                &self.environment_variables,
                &new.environment_variables,
            ),
            compare("mainClass", &self.main_class, &new.main_class),
            compare("arguments", &self.arguments, &new.arguments),
        ])
    }
}

fn compile_changes(old: &CompileSettings, new: &CompileSettings) -> Vec<FieldChange> {
    changed([
        compare("sourceDirs", &old.source_dirs, &new.source_dirs),
        compare(
            "generatedSourceDirs",
            &old.generated_source_dirs,
            &new.generated_source_dirs,
        ),
        compare("classesDir", &old.classes_dir, &new.classes_dir),
        compare("compileTaskName", &old.compile_task_name, &new.compile_task_name),
    ])
}

fn java_changes(old: &JavaExtension, new: &JavaExtension) -> Vec<FieldChange> {
    let mut changes = compile_changes(&old.compile, &new.compile);
    changes.extend(changed([
        compare("javaHome", &old.java_home, &new.java_home),
        compare("javaVersion", &old.java_version, &new.java_version),
        compare(
            "sourceCompatibility",
            &old.source_compatibility,
            &new.source_compatibility,
        ),
        compare(
            "targetCompatibility",
            &old.target_compatibility,
            &new.target_compatibility,
        ),
        compare("compilerArgs", &old.compiler_args, &new.compiler_args),
    ]));
    changes
}

fn scala_changes(old: &ScalaExtension, new: &ScalaExtension) -> Vec<FieldChange> {
    let mut changes = compile_changes(&old.compile, &new.compile);
    changes.extend(changed([
        compare(
            "scalaCompilerArgs",
            &old.scala_compiler_args,
            &new.scala_compiler_args,
        ),
        compare("scalaOrganization", &old.scala_organization, &new.scala_organization),
        compare("scalaVersion", &old.scala_version, &new.scala_version),
        compare(
            "scalaBinaryVersion",
            &old.scala_binary_version,
            &new.scala_binary_version,
        ),
        compare("scalaJars", &old.scala_jars, &new.scala_jars),
    ]));
    changes
}

fn kotlin_changes(old: &KotlinExtension, new: &KotlinExtension) -> Vec<FieldChange> {
    let mut changes = compile_changes(&old.compile, &new.compile);
    changes.extend(changed([
        compare(
            "kotlinLanguageVersion",
            &old.kotlin_language_version,
            &new.kotlin_language_version,
        ),
        compare("kotlinApiVersion", &old.kotlin_api_version, &new.kotlin_api_version),
        compare("kotlincOptions", &old.kotlinc_options, &new.kotlinc_options),
        compare("kotlinAssociates", &old.kotlin_associates, &new.kotlin_associates),
    ]));
    changes
}

fn groovy_changes(old: &GroovyExtension, new: &GroovyExtension) -> Vec<FieldChange> {
    compile_changes(&old.compile, &new.compile)
}

fn antlr_changes(old: &AntlrExtension, new: &AntlrExtension) -> Vec<FieldChange> {
    compile_changes(&old.compile, &new.compile)
}

impl Diff for LanguageExtension {
    /// `java extension (javaVersion=17, sourceCompatibility=17)`, listing
    /// only the fields that are set.
    fn describe(&self) -> String {
        let mut fields: Vec<String> = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map
                .into_iter()
                .filter(|(_, value)| !is_unset(value))
                .map(|(key, value)| match value {
                    serde_json::Value::String(s) => format!("{}={}", key, s),
                    other => format!("{}={}", key, other),
                })
                .collect(),
            _ => Vec::new(),
        };
        fields.sort();

        if fields.is_empty() {
            format!("{} extension", self.language())
        } else {
            format!("{} extension ({})", self.language(), fields.join(", "))
        }
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        match (self, new) {
            (LanguageExtension::Java(old), LanguageExtension::Java(new)) => java_changes(old, new),
            (LanguageExtension::Scala(old), LanguageExtension::Scala(new)) => {
                scala_changes(old, new)
            }
            (LanguageExtension::Kotlin(old), LanguageExtension::Kotlin(new)) => {
                kotlin_changes(old, new)
            }
            (LanguageExtension::Groovy(old), LanguageExtension::Groovy(new)) => {
                groovy_changes(old, new)
            }
            (LanguageExtension::Antlr(old), LanguageExtension::Antlr(new)) => {
                antlr_changes(old, new)
            }
            // different languages are reported whole
            _ => Vec::new(),
        }
    }
}

fn is_unset(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Extensions are matched by language, in canonical language order. A
/// language present on one side only is reported against `none`.
fn compare_extensions(
    name: &str,
    old: &BTreeMap<Language, LanguageExtension>,
    new: &BTreeMap<Language, LanguageExtension>,
) -> Option<FieldChange> {
    if old == new {
        return None;
    }

    let languages: BTreeSet<Language> = old.keys().chain(new.keys()).copied().collect();
    let entries: Vec<FieldChange> = languages
        .into_iter()
        .enumerate()
        .filter_map(|(i, language)| {
            let entry = compare(
                &format!("key:{} value", language),
                &old.get(&language).cloned(),
                &new.get(&language).cloned(),
            )?;
            Some(FieldChange {
                name: i.to_string(),
                change: Change::Nested(vec![entry]),
            })
        })
        .collect();

    Some(FieldChange {
        name: name.to_string(),
        change: Change::Nested(entries),
    })
}

impl Diff for SourceSet {
    fn describe(&self) -> String {
        self.display_name()
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        changed([
            compare("gradleVersion", &self.gradle_version, &new.gradle_version),
            compare("projectName", &self.project_name, &new.project_name),
            compare("projectPath", &self.project_path, &new.project_path),
            compare("projectDir", &self.project_dir, &new.project_dir),
            compare("rootDir", &self.root_dir, &new.root_dir),
            compare("sourceSetName", &self.source_set_name, &new.source_set_name),
            compare("classesTaskName", &self.classes_task_name, &new.classes_task_name),
            compare("cleanTaskName", &self.clean_task_name, &new.clean_task_name),
            compare("taskNames", &self.task_names, &new.task_names),
            compare("sourceDirs", &self.source_dirs, &new.source_dirs),
            compare(
                "generatedSourceDirs",
                &self.generated_source_dirs,
                &new.generated_source_dirs,
            ),
            compare("resourceDirs", &self.resource_dirs, &new.resource_dirs),
            compare("sourceOutputDirs", &self.source_output_dirs, &new.source_output_dirs),
            compare(
                "resourceOutputDirs",
                &self.resource_output_dirs,
                &new.resource_output_dirs,
            ),
            compare(
                "archiveOutputFiles",
                &self.archive_output_files,
                &new.archive_output_files,
            ),
            compare("compileClasspath", &self.compile_classpath, &new.compile_classpath),
            compare("runtimeClasspath", &self.runtime_classpath, &new.runtime_classpath),
            compare(
                "moduleDependencies",
                &self.module_dependencies,
                &new.module_dependencies,
            ),
            compare(
                "buildTargetDependencies",
                &self.build_target_dependencies,
                &new.build_target_dependencies,
            ),
            compare("hasTests", &self.has_tests, &new.has_tests),
            compare("runTasks", &self.run_tasks, &new.run_tasks),
            compare_extensions("extensions", &self.extensions, &new.extensions),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScalaExtension;

    #[test]
    fn test_module_dependency_version_change() {
        let old = ModuleDependency::new("org.example", "lib", "1.0")
            .with_artifact(Artifact::new("file:///repo/lib-1.0.jar"));
        let new = ModuleDependency::new("org.example", "lib", "1.1")
            .with_artifact(Artifact::new("file:///repo/lib-1.1.jar"));

        let change = compare("moduleDependencies", &vec![old], &vec![new]).unwrap();
        assert_eq!(
            change.to_string(),
            "moduleDependencies: (0: (version: (1.0 -> 1.1), artifacts: (0: (uri: (file:///repo/lib-1.0.jar -> file:///repo/lib-1.1.jar)))))"
        );
    }

    #[test]
    fn test_extension_language_swap_reported_whole() {
        let java: LanguageExtension = JavaExtension::default().into();
        let scala: LanguageExtension = ScalaExtension::default().into();

        let change = compare("ext", &java, &scala).unwrap();
        assert_eq!(change.to_string(), "ext: (java extension -> scala extension)");
    }

    #[test]
    fn test_extension_describe_lists_set_fields() {
        let java: LanguageExtension = JavaExtension {
            java_version: Some("17".to_string()),
            compiler_args: vec!["-parameters".to_string()],
            ..Default::default()
        }
        .into();

        assert_eq!(
            java.describe(),
            r#"java extension (compilerArgs=["-parameters"], javaVersion=17)"#
        );
    }

    #[test]
    fn test_extensions_matched_by_language() {
        let mut old = SourceSet::new("/w/app", "main");
        old.extensions.insert(
            Language::Java,
            JavaExtension {
                source_compatibility: Some("17".to_string()),
                ..Default::default()
            }
            .into(),
        );

        let mut new = old.clone();
        new.extensions.insert(
            Language::Java,
            JavaExtension {
                source_compatibility: Some("9".to_string()),
                ..Default::default()
            }
            .into(),
        );
        new.extensions.insert(
            Language::Kotlin,
            KotlinExtension {
                kotlin_language_version: Some("1.9".to_string()),
                ..Default::default()
            }
            .into(),
        );

        let changes = old.field_changes(&new);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].to_string(),
            "extensions: (0: (key:java value: (sourceCompatibility: (17 -> 9))), \
             1: (key:kotlin value: (none -> kotlin extension (kotlinLanguageVersion=1.9))))"
        );

        // and the other way round
        let changes = new.field_changes(&old);
        assert_eq!(
            changes[0].to_string(),
            "extensions: (0: (key:java value: (sourceCompatibility: (9 -> 17))), \
             1: (key:kotlin value: (kotlin extension (kotlinLanguageVersion=1.9) -> none)))"
        );
    }

    #[test]
    fn test_build_target_dependency_change() {
        let mut old = SourceSet::new("/w/app", "test");
        old.build_target_dependencies
            .insert(SourceSetId::new("/w/app", "main"));
        let mut new = old.clone();
        new.build_target_dependencies.clear();
        new.build_target_dependencies
            .insert(SourceSetId::new("/w/lib", "main"));

        let changes = old.field_changes(&new);
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].to_string(),
            "buildTargetDependencies: (0: (projectDir: (/w/app -> /w/lib)))"
        );
    }

    #[test]
    fn test_run_task_env_change() {
        let old = RunTask {
            task_path: ":app:run".to_string(),
            ..Default::default()
        };
        let mut new = old.clone();
        new.environment_variables
            .insert("MODE".to_string(), "dev".to_string());

        let change = compare("runTasks", &vec![old], &vec![new]).unwrap();
        assert_eq!(
            change.to_string(),
            "runTasks: (0: (environmentVariables: ({} -> {MODE=dev})))"
        );
    }
}

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::Notify;
use xi18n::{
    core::{CompilerHost, CompilerOptions, Program, ResourceError, ResourceLoader},
    extractor::{ExtractError, Extraction, Extractor},
};

/// Project files kept in memory, keyed by project-relative path.
#[derive(Default)]
struct Project {
    files: HashMap<String, String>,
}

impl Project {
    fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// A source file with its metadata sidecar.
    fn source(self, path: &str, metadata: &str) -> Self {
        let sidecar = format!("{}.metadata.json", path.trim_end_matches(".ts"));
        self.file(path, "").file(&sidecar, metadata)
    }

    fn module(self, path: &str, name: &str, declarations: &[&str]) -> Self {
        let declarations = serde_json::to_string(declarations).unwrap();
        self.source(
            path,
            &format!(
                r#"{{ "symbols": {{ "{name}": {{ "kind": "module", "declarations": {declarations} }} }} }}"#
            ),
        )
    }

    fn component(self, path: &str, name: &str, template_url: &str) -> Self {
        self.source(
            path,
            &format!(
                r#"{{ "symbols": {{ "{name}": {{ "kind": "component", "selector": "app-x", "templateUrl": "{template_url}" }} }} }}"#
            ),
        )
    }

    fn program(&self) -> Program {
        Program::new(
            self.files
                .keys()
                .filter(|path| path.ends_with(".ts"))
                .cloned()
                .collect(),
        )
    }
}

struct MemoryHost(HashMap<String, String>);

impl CompilerHost for MemoryHost {
    fn read_file(&self, path: &str) -> io::Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn file_exists(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }
}

/// Resource loader whose loads can be held back until another resource loaded.
struct OrderedLoader {
    files: HashMap<String, String>,
    after: HashMap<String, String>,
    loaded: HashMap<String, Arc<Notify>>,
    completed: Mutex<Vec<String>>,
}

impl OrderedLoader {
    fn new(files: HashMap<String, String>) -> Self {
        let loaded = files
            .keys()
            .map(|path| (path.clone(), Arc::new(Notify::new())))
            .collect();
        Self {
            files,
            after: HashMap::new(),
            loaded,
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Hold `url` back until `dependency` has loaded.
    fn load_after(mut self, url: &str, dependency: &str) -> Self {
        self.after.insert(url.to_string(), dependency.to_string());
        self
    }

    fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceLoader for OrderedLoader {
    async fn get(&self, url: &str) -> Result<String, ResourceError> {
        if let Some(gate) = self.after.get(url).and_then(|dep| self.loaded.get(dep)) {
            gate.notified().await;
        }
        tokio::task::yield_now().await;

        self.completed.lock().unwrap().push(url.to_string());
        if let Some(done) = self.loaded.get(url) {
            done.notify_one();
        }
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound {
                url: url.to_string(),
            })
    }
}

fn extractor(project: &Project, loader: Arc<OrderedLoader>) -> Extractor {
    Extractor::create(
        CompilerOptions::default(),
        "xlf",
        project.program(),
        Arc::new(MemoryHost(project.files.clone())),
        loader,
        None,
    )
    .unwrap()
}

fn two_file_project(a_template: &str, b_template: &str) -> Project {
    Project::default()
        .module(
            "src/app.module.ts",
            "AppModule",
            &["./a#AComponent", "./b#BComponent"],
        )
        .component("src/a.ts", "AComponent", "./a.html")
        .component("src/b.ts", "BComponent", "./b.html")
        .file("src/a.html", a_template)
        .file("src/b.html", b_template)
}

fn loader_for(project: &Project) -> Arc<OrderedLoader> {
    Arc::new(OrderedLoader::new(project.files.clone()))
}

fn contents(extraction: Extraction) -> Vec<String> {
    let bundle = extraction.into_result().unwrap();
    bundle.messages().iter().map(|m| m.content()).collect()
}

#[tokio::test]
async fn test_program_without_components_yields_empty_bundle() {
    let project = Project::default()
        .module("src/app.module.ts", "AppModule", &[])
        .file("src/util.ts", "");

    let extraction = extractor(&project, loader_for(&project))
        .extract()
        .await
        .unwrap();

    assert!(extraction.into_result().unwrap().is_empty());
}

#[tokio::test]
async fn test_bundle_holds_messages_of_all_files() {
    let project = two_file_project("<h1 i18n>Hello</h1>", "<p i18n>Goodbye</p><p>plain</p>");

    let extraction = extractor(&project, loader_for(&project))
        .extract()
        .await
        .unwrap();

    assert_eq!(contents(extraction), vec!["Hello", "Goodbye"]);
}

#[tokio::test]
async fn test_bundle_order_ignores_completion_order() {
    let project = two_file_project("<h1 i18n>Hello</h1>", "<p i18n>Goodbye</p>");
    let loader = Arc::new(OrderedLoader::new(project.files.clone()).load_after("src/a.html", "src/b.html"));

    let extraction = extractor(&project, loader.clone())
        .extract()
        .await
        .unwrap();

    assert_eq!(loader.completed(), vec!["src/b.html", "src/a.html"]);
    assert_eq!(contents(extraction), vec!["Hello", "Goodbye"]);
}

#[tokio::test]
async fn test_template_errors_replace_the_bundle() {
    let project = two_file_project("<h1 i18n>Hello</h1>", "<p i18n>Bye</b>");

    let extraction = extractor(&project, loader_for(&project))
        .extract()
        .await
        .unwrap();

    let err = extraction.into_result().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected closing tag \"b\": src/b.ts@1:12"
    );
}

#[tokio::test]
async fn test_template_errors_of_all_files_are_aggregated() {
    let project = two_file_project("<div i18n>a <span i18n>b</span></div>", "<p i18n>Hi {{ }}</p>");

    let extraction = extractor(&project, loader_for(&project))
        .extract()
        .await
        .unwrap();

    let Extraction::TemplateErrors(errors) = extraction else {
        panic!("expected template errors");
    };
    let files: Vec<_> = errors
        .iter()
        .map(|e| e.location.file_path.as_str())
        .collect();
    assert_eq!(files, vec!["src/a.ts", "src/b.ts"]);
    assert_eq!(
        errors[0].msg,
        "Could not mark an element as translatable inside a translatable section"
    );
    assert_eq!(
        errors[1].msg,
        "Blank expressions are not allowed in interpolated strings"
    );
}

#[tokio::test]
async fn test_missing_template_fails_the_run() {
    let project = two_file_project("<p i18n>Bye</b>", "<p i18n>Goodbye</p>");
    let mut files = project.files.clone();
    files.remove("src/b.html");
    let loader = Arc::new(OrderedLoader::new(files));

    let result = extractor(&project, loader.clone()).extract().await;

    assert!(matches!(result, Err(ExtractError::Normalization(_))));
    // Every load still ran before the run failed.
    let mut completed = loader.completed();
    completed.sort();
    assert_eq!(completed, vec!["src/a.html", "src/b.html"]);
}

#[tokio::test]
async fn test_repeated_runs_yield_the_same_bundle() {
    let project = two_file_project("<h1 i18n>Hello</h1>", "<p i18n>Goodbye</p>");
    let extractor = extractor(&project, loader_for(&project));

    let first = contents(extractor.extract().await.unwrap());
    let second = contents(extractor.extract().await.unwrap());

    assert_eq!(first, vec!["Hello", "Goodbye"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_duplicate_messages_are_merged() {
    let project = two_file_project("<h1 i18n>Hello</h1>", "<h2 i18n>Hello</h2><p i18n=\"@@bye\">Bye</p>");

    let bundle = extractor(&project, loader_for(&project))
        .extract()
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(bundle.len(), 2);
    let hello = &bundle.messages()[0];
    let files: Vec<_> = hello.sources.iter().map(|s| s.file_path.as_str()).collect();
    assert_eq!(files, vec!["src/a.ts", "src/b.ts"]);
    assert_eq!(bundle.get("bye").map(|m| m.content()), Some("Bye".to_string()));
}

#[tokio::test]
async fn test_unknown_format_is_rejected() {
    let project = Project::default();
    let result = Extractor::create(
        CompilerOptions::default(),
        "json",
        project.program(),
        Arc::new(MemoryHost(HashMap::new())),
        loader_for(&project),
        None,
    );

    assert!(result.is_err());
}

#[tokio::test]
async fn test_error_order_ignores_completion_order() {
    let project = two_file_project("<p>Hi</b>", "<p>Yo</i>");
    let loader = Arc::new(OrderedLoader::new(project.files.clone()).load_after("src/a.html", "src/b.html"));

    let extraction = extractor(&project, loader.clone())
        .extract()
        .await
        .unwrap();

    assert_eq!(loader.completed(), vec!["src/b.html", "src/a.html"]);
    let err = extraction.into_result().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected closing tag \"b\": src/a.ts@1:6\nUnexpected closing tag \"i\": src/b.ts@1:6"
    );
}

#[tokio::test]
async fn test_analysis_failure_stops_before_loading_templates() {
    let project = two_file_project("<h1 i18n>Hello</h1>", "<p i18n>Goodbye</p>").source(
        "src/app.module.ts",
        r#"{ "symbols": { "AppModule": {
            "kind": "module",
            "declarations": ["./a#AComponent", "./b#BComponent"],
            "imports": ["./missing#MissingModule"]
        } } }"#,
    );
    let loader = loader_for(&project);

    let result = extractor(&project, loader.clone()).extract().await;

    assert!(matches!(result, Err(ExtractError::Analysis(_))));
    assert!(loader.completed().is_empty());
}

#[tokio::test]
async fn test_plain_directives_are_not_extracted() {
    let project = Project::default()
        .module(
            "src/app.module.ts",
            "AppModule",
            &["./a#AComponent", "./a#TooltipDirective"],
        )
        .source(
            "src/a.ts",
            r#"{ "symbols": {
                "AComponent": { "kind": "component", "selector": "app-a", "templateUrl": "./a.html" },
                "TooltipDirective": { "kind": "directive", "selector": "[tooltip]" }
            } }"#,
        )
        .file("src/a.html", "<h1 i18n>Hello</h1>");
    let loader = loader_for(&project);

    let extraction = extractor(&project, loader.clone())
        .extract()
        .await
        .unwrap();

    assert_eq!(contents(extraction), vec!["Hello"]);
    assert_eq!(loader.completed(), vec!["src/a.html"]);
}

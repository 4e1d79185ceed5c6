//! Rust source introspection for Privy.
//!
//! Parses `.rs` files with `syn` and reports, for each struct, enum and
//! union, the fields it declares and the members of its inherent impls.
//! Trait impls contribute nothing: their methods are reachable through the
//! trait and are not declared on the type.

/// Two-pass collection of types and impl members.
pub mod collect;
/// Error types for reading and parsing sources.
pub mod error;
/// Conversions from syntax to descriptor vocabulary.
pub mod render;

use std::path::{Path, PathBuf};

use privy_core::{
    BehaviorDescriptor, FieldDescriptor, TypeCatalog, TypeDescriptor, TypeIntrospection,
};
use tracing::debug;
use walkdir::WalkDir;

pub use collect::Collector;
pub use error::{SourceError, SourceResult};

/// A [`TypeIntrospection`] backed by parsed Rust sources.
#[derive(Debug, Clone, Default)]
pub struct SourceIntrospection {
    catalog: TypeCatalog,
}

impl SourceIntrospection {
    /// Parse a single in-memory source as the crate root.
    pub fn parse(source: &str) -> SourceResult<Self> {
        let file = syn::parse_file(source).map_err(|e| SourceError::parse("<source>", &e))?;
        let mut collector = Collector::new();
        collector.add_file(&file, &[], "<source>")?;
        Ok(Self {
            catalog: collector.finish(),
        })
    }

    /// Parse one file as the crate root.
    pub fn from_file(path: &Path) -> SourceResult<Self> {
        let mut collector = Collector::new();
        add_path(&mut collector, path, &[])?;
        Ok(Self {
            catalog: collector.finish(),
        })
    }

    /// Parse every `.rs` file under `dir`.
    ///
    /// Module paths follow the file layout: `a/b.rs` and `a/b/mod.rs` both
    /// become `a::b`, while `lib.rs` and `mod.rs` add no segment. A top-level
    /// `main.rs` is the root only when there is no `lib.rs` beside it;
    /// otherwise it is a separate crate root and its types live under `main`.
    /// Symbolic links are not followed.
    pub fn from_dir(dir: &Path) -> SourceResult<Self> {
        let files = rust_files(dir)?;
        let has_lib = files.iter().any(|f| f.parent() == Some(dir) && f.ends_with("lib.rs"));

        let mut collector = Collector::new();
        for file in &files {
            let module = module_path_for(dir, file, has_lib);
            add_path(&mut collector, file, &module)?;
        }
        debug!(dir = %dir.display(), files = files.len(), "parsed source directory");
        Ok(Self {
            catalog: collector.finish(),
        })
    }

    /// Parse a file or a directory, whichever `path` is.
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    /// The collected definitions.
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }
}

impl TypeIntrospection for SourceIntrospection {
    fn resolve(&self, name: &str) -> Option<TypeDescriptor> {
        self.catalog.resolve(name)
    }

    fn declared_fields(&self, ty: &TypeDescriptor) -> Vec<FieldDescriptor> {
        self.catalog.declared_fields(ty)
    }

    fn declared_behaviors(&self, ty: &TypeDescriptor) -> Vec<BehaviorDescriptor> {
        self.catalog.declared_behaviors(ty)
    }
}

fn add_path(collector: &mut Collector, path: &Path, module: &[String]) -> SourceResult<()> {
    let source = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let origin = path.display().to_string();
    let file = syn::parse_file(&source).map_err(|e| SourceError::parse(origin.as_str(), &e))?;
    debug!(file = %origin, items = file.items.len(), "parsed source file");
    collector.add_file(&file, module, &origin)
}

/// Every `.rs` file under `dir`, in a stable order.
fn rust_files(dir: &Path) -> SourceResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| SourceError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: std::io::Error::from(e),
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "rs") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn module_path_for(root: &Path, file: &Path, has_lib: bool) -> Vec<String> {
    let relative = file.strip_prefix(root).unwrap_or(file).with_extension("");
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let crate_root = !has_lib && matches!(segments.as_slice(), [only] if only == "main");
    if crate_root
        || segments
            .last()
            .is_some_and(|last| matches!(last.as_str(), "lib" | "mod"))
    {
        segments.pop();
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use privy_core::MemberInventory;
    use tempfile::TempDir;

    const COUNTER: &str = r#"
        pub struct Counter {
            count: u32,
            pub label: String,
        }

        impl Counter {
            pub fn new() -> Self { Self { count: 0, label: String::new() } }
            fn helper_a(&self) {}
            fn helper_b(&mut self, step: u32) -> u32 { step }
        }
    "#;

    #[test]
    fn parse_and_build_inventory() {
        let src = SourceIntrospection::parse(COUNTER).unwrap();
        let inv = MemberInventory::create_by_name(&src, "Counter").unwrap();
        assert!(inv.has_private_members());
        assert_eq!(inv.fields().len(), 1);
        assert_eq!(inv.fields()[0].name, "count");
        let names: Vec<_> = inv.behaviors().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["helper_a", "helper_b"]);
    }

    #[test]
    fn parse_error_names_source() {
        let err = SourceIntrospection::parse("struct Broken {\n  field: \n").unwrap_err();
        match err {
            SourceError::Parse { file, message, .. } => {
                assert_eq!(file, "<source>");
                assert!(!message.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SourceIntrospection::from_file(Path::new("/definitely/not/here.rs")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().starts_with("cannot read /definitely/not/here.rs"));
    }

    #[test]
    fn directory_layout_sets_module_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lib.rs"), "mod shapes; struct Root { id: u8 }").unwrap();
        fs::create_dir(dir.path().join("shapes")).unwrap();
        fs::write(
            dir.path().join("shapes/mod.rs"),
            "pub struct Circle { radius: f64 }",
        )
        .unwrap();
        fs::write(
            dir.path().join("shapes/ops.rs"),
            "impl super::Circle { fn area(&self) -> f64 { 0.0 } }",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not rust").unwrap();

        let src = SourceIntrospection::from_path(dir.path()).unwrap();
        assert_eq!(src.catalog().len(), 2);

        let root = src.resolve("Root").unwrap();
        assert!(root.module_path.is_empty());

        let circle = src.resolve("shapes::Circle").unwrap();
        assert_eq!(circle.module_path, ["shapes"]);
        let inv = MemberInventory::create(&src, Some(&circle)).unwrap();
        assert_eq!(inv.fields().len(), 1);
        assert_eq!(inv.behaviors().len(), 1);
        assert_eq!(inv.behaviors()[0].signature(), "area() -> f64");
    }

    #[test]
    fn module_paths_from_files() {
        let root = Path::new("/src");
        assert!(module_path_for(root, Path::new("/src/lib.rs"), true).is_empty());
        assert_eq!(module_path_for(root, Path::new("/src/a.rs"), true), ["a"]);
        assert_eq!(module_path_for(root, Path::new("/src/a/b.rs"), true), ["a", "b"]);
        assert_eq!(module_path_for(root, Path::new("/src/a/mod.rs"), true), ["a"]);
        assert!(module_path_for(root, Path::new("/src/main.rs"), false).is_empty());
        assert_eq!(module_path_for(root, Path::new("/src/main.rs"), true), ["main"]);
        assert_eq!(module_path_for(root, Path::new("/src/a/main.rs"), false), ["a", "main"]);
    }

    #[test]
    fn main_beside_lib_is_a_separate_root() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("lib.rs"),
            "pub struct Config { secret: u8 } impl Config { fn lib_only(&self) {} }",
        )
        .unwrap();
        fs::write(
            dir.path().join("main.rs"),
            "struct Config { other: u16 } impl Config { fn main_only(&self) {} }",
        )
        .unwrap();

        let src = SourceIntrospection::from_dir(dir.path()).unwrap();
        assert_eq!(src.catalog().len(), 2);

        let lib = src.catalog().get("Config").unwrap();
        assert!(lib.descriptor.module_path.is_empty());
        let names: Vec<_> = lib.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["secret"]);
        let names: Vec<_> = lib.behaviors.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["lib_only"]);

        let bin = src.resolve("main::Config").unwrap();
        assert_eq!(bin.module_path, ["main"]);
        let inv = MemberInventory::create(&src, Some(&bin)).unwrap();
        assert_eq!(inv.fields()[0].name, "other");
        assert_eq!(inv.behaviors().len(), 1);
        assert_eq!(inv.behaviors()[0].name, "main_only");
    }

    #[test]
    fn main_alone_is_the_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.rs"), "struct App { state: u8 }").unwrap();
        let src = SourceIntrospection::from_dir(dir.path()).unwrap();
        assert!(src.resolve("App").unwrap().module_path.is_empty());
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let err = SourceIntrospection::parse("struct Dup { a: u8 } struct Dup { b: u8 }").unwrap_err();
        match &err {
            SourceError::DuplicateType { file, ty } => {
                assert_eq!(file, "<source>");
                assert_eq!(ty, "Dup");
            }
            other => panic!("expected duplicate type, got {other:?}"),
        }
        assert_eq!(err.to_string(), "<source>: type Dup is already declared");
    }

    #[test]
    fn duplicate_across_files_names_second_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lib.rs"), "mod a; struct Root;").unwrap();
        fs::write(dir.path().join("a.rs"), "pub struct Item;").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/mod.rs"), "pub struct Item;").unwrap();

        let err = SourceIntrospection::from_dir(dir.path()).unwrap_err();
        match err {
            SourceError::DuplicateType { ty, .. } => assert_eq!(ty, "a::Item"),
            other => panic!("expected duplicate type, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lib.rs"), "struct A { x: u8 }").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

        let src = SourceIntrospection::from_dir(dir.path()).unwrap();
        assert_eq!(src.catalog().len(), 1);
        assert!(src.resolve("A").is_some());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let err = SourceIntrospection::from_dir(&gone).unwrap_err();
        match err {
            SourceError::Io { path, .. } => assert_eq!(path, gone),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}

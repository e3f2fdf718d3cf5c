//! The resolution context: the companion file plus every type declaration
//! file reachable from it through relative imports and re-exports.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use swc_ecma_ast::{
    ImportSpecifier, ModuleDecl, ModuleExportName, ModuleItem, TsInterfaceDecl, TsTypeAliasDecl,
};
use tracing::{debug, trace};

use crate::core::decls::{TypeDecl, top_level_decls};
use crate::core::parsers::ts::{ParsedSource, SourceKind, parse_typescript_source};
use crate::core::shape::ExtractError;

/// Index of a file inside a [`TypeProgram`].
pub type FileId = usize;

/// The file the program was built from.
pub const ROOT_FILE: FileId = 0;

/// Upper bound on the number of files loaded into one program.
pub const MAX_PROGRAM_FILES: usize = 64;

/// Upper bound on import/re-export hops followed while looking up a name.
const MAX_LINK_DEPTH: usize = 16;

/// One declaration of a named type. Interfaces may have several (declaration merging).
#[derive(Debug, Clone)]
pub enum SymbolDecl {
    Interface(Box<TsInterfaceDecl>),
    Alias(Box<TsTypeAliasDecl>),
}

/// A resolved type name: the file that declares it and its declarations.
#[derive(Debug, Clone, Copy)]
pub struct Symbol<'p> {
    pub file: FileId,
    pub name: &'p str,
    pub decls: &'p [SymbolDecl],
}

/// A name bound to an export of another file.
#[derive(Debug, Clone)]
struct Link {
    path: PathBuf,
    name: String,
}

pub struct ProgramFile {
    pub path: PathBuf,
    pub parsed: ParsedSource,
    /// Local type declarations, in first-declaration order.
    order: Vec<String>,
    symbols: HashMap<String, (bool, Vec<SymbolDecl>)>,
    imports: IndexMap<String, Link>,
    namespace_imports: IndexMap<String, PathBuf>,
    /// `export { Local as Exported }` without a source: exported → local.
    local_exports: HashMap<String, String>,
    /// `export { Orig as Exported } from "./x"`: exported → link.
    reexports: IndexMap<String, Link>,
    /// `export * from "./x"`.
    star_exports: Vec<PathBuf>,
}

impl ProgramFile {
    fn new(path: PathBuf, parsed: ParsedSource) -> Self {
        let mut file = Self {
            path,
            parsed,
            order: Vec::new(),
            symbols: HashMap::new(),
            imports: IndexMap::new(),
            namespace_imports: IndexMap::new(),
            local_exports: HashMap::new(),
            reexports: IndexMap::new(),
            star_exports: Vec::new(),
        };
        file.index_declarations();
        file.index_module_links();
        file
    }

    fn index_declarations(&mut self) {
        let mut symbols: HashMap<String, (bool, Vec<SymbolDecl>)> = HashMap::new();
        let mut order = Vec::new();

        for top in top_level_decls(&self.parsed.module) {
            let name = top.name().to_string();
            let decl = match top.decl {
                TypeDecl::Interface(iface) => SymbolDecl::Interface(Box::new(iface.clone())),
                TypeDecl::Alias(alias) => SymbolDecl::Alias(Box::new(alias.clone())),
            };
            let entry = symbols.entry(name.clone()).or_insert_with(|| {
                order.push(name);
                (false, Vec::new())
            });
            entry.0 |= top.exported;
            entry.1.push(decl);
        }

        self.symbols = symbols;
        self.order = order;
    }

    fn index_module_links(&mut self) {
        let dir = self.path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut links = Vec::new();

        for item in &self.parsed.module.body {
            let ModuleItem::ModuleDecl(module_decl) = item else {
                continue;
            };
            match module_decl {
                ModuleDecl::Import(import) => {
                    let Some(target) = specifier_path(&dir, import.src.value.as_str()) else {
                        continue;
                    };
                    for specifier in &import.specifiers {
                        match specifier {
                            ImportSpecifier::Named(named) => {
                                let imported = named
                                    .imported
                                    .as_ref()
                                    .and_then(export_name)
                                    .unwrap_or_else(|| named.local.sym.to_string());
                                links.push((
                                    LinkKind::Import(named.local.sym.to_string()),
                                    target.clone(),
                                    imported,
                                ));
                            }
                            ImportSpecifier::Default(default) => links.push((
                                LinkKind::Import(default.local.sym.to_string()),
                                target.clone(),
                                "default".to_string(),
                            )),
                            ImportSpecifier::Namespace(namespace) => {
                                self.namespace_imports
                                    .insert(namespace.local.sym.to_string(), target.clone());
                            }
                        }
                    }
                }
                ModuleDecl::ExportNamed(export) => {
                    let target = match &export.src {
                        Some(src) => match specifier_path(&dir, src.value.as_str()) {
                            Some(target) => Some(target),
                            None => continue,
                        },
                        None => None,
                    };
                    for specifier in &export.specifiers {
                        let swc_ecma_ast::ExportSpecifier::Named(named) = specifier else {
                            continue;
                        };
                        let Some(orig) = export_name(&named.orig) else {
                            continue;
                        };
                        let exported = named
                            .exported
                            .as_ref()
                            .and_then(export_name)
                            .unwrap_or_else(|| orig.clone());
                        match &target {
                            Some(target) => {
                                links.push((LinkKind::Reexport(exported), target.clone(), orig))
                            }
                            None => {
                                self.local_exports.insert(exported, orig);
                            }
                        }
                    }
                }
                ModuleDecl::ExportAll(export) => {
                    if let Some(target) = specifier_path(&dir, export.src.value.as_str()) {
                        self.star_exports.push(target);
                    }
                }
                _ => {}
            }
        }

        for (kind, path, name) in links {
            match kind {
                LinkKind::Import(local) => {
                    self.imports.insert(local, Link { path, name });
                }
                LinkKind::Reexport(exported) => {
                    self.reexports.insert(exported, Link { path, name });
                }
            }
        }
    }

    /// Every module path this file links to, in source order per link kind.
    fn linked_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.imports
            .values()
            .map(|link| &link.path)
            .chain(self.reexports.values().map(|link| &link.path))
            .chain(self.namespace_imports.values())
            .chain(self.star_exports.iter())
    }

    /// Names of local type declarations, in source order, with their export flag.
    pub fn declared_names(&self) -> impl Iterator<Item = (&str, bool)> {
        self.order.iter().map(|name| {
            let exported = self.symbols.get(name).is_some_and(|(exported, _)| *exported)
                || self.local_exports.values().any(|local| local == name);
            (name.as_str(), exported)
        })
    }
}

enum LinkKind {
    Import(String),
    Reexport(String),
}

fn export_name(name: &ModuleExportName) -> Option<String> {
    match name {
        ModuleExportName::Ident(ident) => Some(ident.sym.to_string()),
        ModuleExportName::Str(s) => s.value.as_str().map(str::to_string),
    }
}

/// Module path for a relative specifier. Package specifiers resolve to `None`.
fn specifier_path(dir: &Path, specifier: Option<&str>) -> Option<PathBuf> {
    let specifier = specifier?;
    if !(specifier.starts_with("./") || specifier.starts_with("../")) {
        return None;
    }
    Some(normalize_path(&dir.join(specifier)))
}

/// Lexically resolve `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Files a module specifier path may refer to, in probe order.
fn module_file_candidates(path: &Path) -> Vec<PathBuf> {
    let text = path.to_string_lossy();

    if let Some(stem) = text.strip_suffix(".js") {
        return vec![PathBuf::from(format!("{stem}.d.ts")), PathBuf::from(format!("{stem}.ts"))];
    }
    if text.ends_with(".ts") {
        return vec![path.to_path_buf()];
    }

    vec![
        PathBuf::from(format!("{text}.d.ts")),
        PathBuf::from(format!("{text}.ts")),
        path.join("index.d.ts"),
        path.join("index.ts"),
    ]
}

/// Type declarations of a root file and everything it links to.
pub struct TypeProgram {
    files: Vec<ProgramFile>,
    /// Module path (as written, before probing) → file.
    index: HashMap<PathBuf, FileId>,
}

impl TypeProgram {
    /// Build a program rooted at `root_path`, whose current text is `root_text`.
    ///
    /// A root that does not parse fails the build. Linked files that cannot be
    /// read or parsed are left out of the program.
    pub fn build(root_path: &Path, root_text: &str) -> Result<Self, ExtractError> {
        let root = parse_typescript_source(
            root_text.to_string(),
            &root_path.to_string_lossy(),
            SourceKind::from_path(root_path),
        )
        .map_err(|err| ExtractError::Parse {
            path: root_path.to_path_buf(),
            message: err.to_string(),
        })?;

        let mut program = Self {
            files: vec![ProgramFile::new(root_path.to_path_buf(), root)],
            index: HashMap::new(),
        };

        let mut queue: VecDeque<PathBuf> = program.files[ROOT_FILE].linked_paths().cloned().collect();
        let mut attempted: Vec<PathBuf> = Vec::new();

        while let Some(module_path) = queue.pop_front() {
            if program.files.len() >= MAX_PROGRAM_FILES {
                debug!(root = %root_path.display(), "program file limit reached");
                break;
            }
            if program.index.contains_key(&module_path) || attempted.contains(&module_path) {
                continue;
            }
            attempted.push(module_path.clone());

            let Some(file) = load_linked_file(&module_path) else {
                continue;
            };

            // Two specifiers may name the same file (`./a` and `./a.js`).
            if let Some(existing) = program.files.iter().position(|f| f.path == file.path) {
                program.index.insert(module_path, existing);
                continue;
            }

            queue.extend(file.linked_paths().cloned());
            program.index.insert(module_path, program.files.len());
            program.files.push(file);
        }

        Ok(program)
    }

    pub fn file(&self, id: FileId) -> &ProgramFile {
        &self.files[id]
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Resolve a (possibly dotted) type name as seen from inside `file`.
    pub fn lookup(&self, file: FileId, name: &str) -> Option<Symbol<'_>> {
        self.lookup_in_scope(file, name, 0)
    }

    /// Resolve a name either in scope of `file` or among its exports
    /// (including re-exports, which do not bind a local name).
    pub fn find_type(&self, file: FileId, name: &str) -> Option<Symbol<'_>> {
        self.lookup(file, name)
            .or_else(|| self.lookup_export(file, name, 0))
    }

    fn lookup_in_scope(&self, file: FileId, name: &str, depth: usize) -> Option<Symbol<'_>> {
        if depth > MAX_LINK_DEPTH {
            return None;
        }
        let current = &self.files[file];

        if let Some((namespace, rest)) = name.split_once('.') {
            let target = self.resolve_module(current.namespace_imports.get(namespace)?)?;
            return self.lookup_export(target, rest, depth + 1);
        }

        if let Some((name, (_, decls))) = current.symbols.get_key_value(name) {
            return Some(Symbol {
                file,
                name: name.as_str(),
                decls,
            });
        }

        let link = current.imports.get(name)?;
        self.lookup_export(self.resolve_module(&link.path)?, &link.name, depth + 1)
    }

    /// Resolve a name exported by `file`.
    fn lookup_export(&self, file: FileId, name: &str, depth: usize) -> Option<Symbol<'_>> {
        if depth > MAX_LINK_DEPTH {
            return None;
        }
        let current = &self.files[file];

        if let Some(local) = current.local_exports.get(name) {
            return self.lookup_in_scope(file, local, depth + 1);
        }
        // Non-exported declarations are accepted too: ambient `.d.ts` files
        // routinely omit `export`.
        if let Some((name, (_, decls))) = current.symbols.get_key_value(name) {
            return Some(Symbol {
                file,
                name: name.as_str(),
                decls,
            });
        }
        if let Some(link) = current.reexports.get(name) {
            return self.lookup_export(self.resolve_module(&link.path)?, &link.name, depth + 1);
        }
        current.star_exports.iter().find_map(|path| {
            let target = self.resolve_module(path)?;
            self.lookup_export(target, name, depth + 1)
        })
    }

    fn resolve_module(&self, path: &Path) -> Option<FileId> {
        self.index.get(path).copied()
    }
}

fn load_linked_file(module_path: &Path) -> Option<ProgramFile> {
    for candidate in module_file_candidates(module_path) {
        if !candidate.is_file() {
            continue;
        }
        let text = match fs::read_to_string(&candidate) {
            Ok(text) => text,
            Err(err) => {
                debug!(path = %candidate.display(), error = %err, "cannot read linked file");
                return None;
            }
        };
        return match parse_typescript_source(
            text,
            &candidate.to_string_lossy(),
            SourceKind::from_path(&candidate),
        ) {
            Ok(parsed) => {
                trace!(path = %candidate.display(), "loaded linked file");
                Some(ProgramFile::new(candidate, parsed))
            }
            Err(err) => {
                debug!(path = %candidate.display(), error = %err, "skipping unparsable linked file");
                None
            }
        };
    }
    None
}

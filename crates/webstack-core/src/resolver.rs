//! Option resolution: which template files and directories a project gets
//!
//! Everything here is a pure function of the [`ConfigRecord`]. The output
//! order is fixed so identical records always produce identical lists.

use crate::config::ConfigRecord;
use std::fmt;

/// A template file to render, and where it lands in the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileOperation {
    /// Path inside the template
    pub from: &'static str,
    /// Path inside the generated project
    pub to: &'static str,
}

impl FileOperation {
    /// Source and destination share the same path
    pub const fn same(path: &'static str) -> Self {
        Self { from: path, to: path }
    }

    pub const fn renamed(from: &'static str, to: &'static str) -> Self {
        Self { from, to }
    }

    pub fn is_renamed(&self) -> bool {
        self.from != self.to
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_renamed() {
            write!(f, "{} -> {}", self.from, self.to)
        } else {
            write!(f, "{}", self.to)
        }
    }
}

/// A directory to ensure exists in the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectoryEntry(pub &'static str);

impl DirectoryEntry {
    pub fn path(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Everything to materialize for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub files: Vec<FileOperation>,
    pub directories: Vec<DirectoryEntry>,
}

use FileOperation as F;

const CSS: &[FileOperation] = &[
    F::same("src/css/reset.css"),
    F::same("src/css/style.css"),
    F::same("src/css/vars.css"),
];
const HTML: &[FileOperation] = &[F::same("src/index.html")];
const JS: &[FileOperation] = &[F::same("src/js/script.js")];

const REACT: &[FileOperation] = &[F::same("src/js/containers/App.jsx")];
const REACT_ROUTER: &[FileOperation] = &[F::same("src/js/containers/Home.jsx")];
const REDUX: &[FileOperation] = &[F::renamed(
    "src/js/stores/redux_store.js",
    "src/js/stores/index.js",
)];
const MOBX: &[FileOperation] = &[
    F::renamed("src/js/stores/mobx_store.js", "src/js/stores/store.js"),
    F::renamed("src/js/stores/mobx_index.js", "src/js/stores/index.js"),
];

const NODE: &[FileOperation] = &[F::same("server/index.js")];
const API: &[FileOperation] = &[
    F::same("server/routes/api/notFound.js"),
    F::same("server/routes/api/_example.js"),
];
const JWT: &[FileOperation] = &[
    F::same("server/const/Scopes.js"),
    F::same("server/schemas/User.js"),
];
const SPA_ROUTE: &[FileOperation] = &[F::same("server/routes/static/spa.js")];
const PUBLIC_ROUTE: &[FileOperation] = &[F::same("server/routes/static/public.js")];

const SETTINGS: &[FileOperation] = &[
    // eslint
    F::same(".eslintignore"),
    F::same(".eslintrc"),
    // git
    F::same("README.md"),
    F::renamed("_gitignore", ".gitignore"),
    // babel, postcss, stylelint, webpack
    F::same(".babelrc"),
    F::same("postcss.config.js"),
    F::same(".stylelintrc"),
    F::same("webpack.config.js"),
    // npm
    F::renamed("_package.json", "package.json"),
    // editor
    F::same(".editorconfig"),
];
const FLOW_SETTINGS: &[FileOperation] = &[F::same(".flowconfig")];
const HEROKU_SETTINGS: &[FileOperation] = &[F::same(".slugignore")];
const NODE_SETTINGS: &[FileOperation] = &[F::same(".env"), F::same("nodemon.json")];

const LIB_DIRS: &[&str] = &["src/js/lib"];
const API_DIRS: &[&str] = &["server/routes/api"];
const NODE_DIRS: &[&str] = &["server/public", "server/uploads", "server/plugins"];
const SCHEMA_DIRS: &[&str] = &["server/schemas"];
const NO_NODE_DIRS: &[&str] = &["dist"];
const REACT_DIRS: &[&str] = &["src/js/components"];
const REDUX_DIRS: &[&str] = &["src/js/actions", "src/js/constants", "src/js/reducers"];
const JEST_DIRS: &[&str] = &["__tests__"];
const ASSET_DIRS: &[&str] = &[
    "src/assets/img",
    "src/assets/fonts",
    "src/assets/svg",
    "src/assets/video",
    "src/assets/audio",
    "src/assets/data",
];

/// Resolve both file operations and directories
pub fn resolve(record: &ConfigRecord) -> Resolution {
    let mut files = app_files(record);
    files.extend(settings_files(record));

    Resolution {
        files,
        directories: directories(record),
    }
}

/// Source files of the application itself
pub fn app_files(record: &ConfigRecord) -> Vec<FileOperation> {
    let mut files = [CSS, HTML, JS].concat();

    if let Some(react) = &record.react {
        files.extend_from_slice(REACT);

        if react.router {
            files.extend_from_slice(REACT_ROUTER);
        }

        if record.redux() {
            files.extend_from_slice(REDUX);
        }

        if record.mobx() {
            files.extend_from_slice(MOBX);
        }
    }

    if record.node() {
        files.extend_from_slice(NODE);

        if record.api() {
            files.extend_from_slice(API);

            if record.jwt() {
                files.extend_from_slice(JWT);
            }
        }

        if record.react_router() {
            files.extend_from_slice(SPA_ROUTE);
        } else {
            files.extend_from_slice(PUBLIC_ROUTE);
        }
    }

    files
}

/// Tooling configuration files (lint, bundler, package manifest, ...)
pub fn settings_files(record: &ConfigRecord) -> Vec<FileOperation> {
    let mut files = SETTINGS.to_vec();

    if record.flow {
        files.extend_from_slice(FLOW_SETTINGS);
    }

    if record.node() {
        if record.heroku() {
            files.extend_from_slice(HEROKU_SETTINGS);
        }
        files.extend_from_slice(NODE_SETTINGS);
    }

    files
}

/// Directories to create; schema directories are left out when JWT provides
/// the schema files explicitly
pub fn directories(record: &ConfigRecord) -> Vec<DirectoryEntry> {
    let mut dirs: Vec<&'static str> = LIB_DIRS.to_vec();

    if record.node() {
        if record.api() {
            dirs.extend_from_slice(API_DIRS);
        }

        dirs.extend_from_slice(NODE_DIRS);

        if record.mongo() && !record.jwt() {
            dirs.extend_from_slice(SCHEMA_DIRS);
        }
    } else {
        dirs.extend_from_slice(NO_NODE_DIRS);
    }

    if record.react() {
        dirs.extend_from_slice(REACT_DIRS);

        if record.redux() {
            dirs.extend_from_slice(REDUX_DIRS);
        }
    }

    if record.jest {
        dirs.extend_from_slice(JEST_DIRS);
    }

    dirs.extend_from_slice(ASSET_DIRS);

    dirs.into_iter().map(DirectoryEntry).collect()
}

/// Every template path any record can reference
pub fn all_template_sources() -> Vec<&'static str> {
    [
        CSS,
        HTML,
        JS,
        REACT,
        REACT_ROUTER,
        REDUX,
        MOBX,
        NODE,
        API,
        JWT,
        SPA_ROUTE,
        PUBLIC_ROUTE,
        SETTINGS,
        FLOW_SETTINGS,
        HEROKU_SETTINGS,
        NODE_SETTINGS,
    ]
    .concat()
    .into_iter()
    .map(|f| f.from)
    .collect()
}

//! WGSL loading with `#include` preprocessing, plus a named module cache.
//!
//! A line of the form `#include "file.wgsl"` is replaced by the contents of
//! that file, itself preprocessed. Each file is spliced at most once per
//! entry shader so shared helpers can be included from several places.

use log::{debug, error, info, warn};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: String, message: String },

    #[error("shader file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("included file not found: {path}")]
    IncludeNotFound { path: String },

    #[error("include cycle through {path}")]
    IncludeCycle { path: String },

    #[error("failed to read shader file: {0}")]
    Io(#[from] std::io::Error),
}

/// Where `#include` targets are looked up.
pub trait IncludeSource {
    fn resolve(&self, path: &str) -> Result<Cow<'_, str>, ShaderError>;
}

/// Reads includes from a directory on disk, for editing shaders without a
/// rebuild.
#[derive(Debug, Clone)]
pub struct DirIncludes {
    root: PathBuf,
}

impl DirIncludes {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl IncludeSource for DirIncludes {
    fn resolve(&self, path: &str) -> Result<Cow<'_, str>, ShaderError> {
        match std::fs::read_to_string(self.root.join(path)) {
            Ok(text) => Ok(Cow::Owned(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ShaderError::IncludeNotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(ShaderError::Io(e)),
        }
    }
}

/// Name-to-source table compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedIncludes(pub &'static [(&'static str, &'static str)]);

impl IncludeSource for EmbeddedIncludes {
    fn resolve(&self, path: &str) -> Result<Cow<'_, str>, ShaderError> {
        self.0
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, source)| Cow::Borrowed(*source))
            .ok_or_else(|| ShaderError::IncludeNotFound {
                path: path.to_string(),
            })
    }
}

/// Expand every `#include` in `source`.
pub fn preprocess_includes(source: &str, includes: &dyn IncludeSource) -> Result<String, ShaderError> {
    let mut out = String::with_capacity(source.len());
    let mut stack = Vec::new();
    let mut seen = HashSet::new();
    expand(source, includes, &mut stack, &mut seen, &mut out)?;
    Ok(out)
}

fn expand(
    source: &str,
    includes: &dyn IncludeSource,
    stack: &mut Vec<String>,
    seen: &mut HashSet<String>,
    out: &mut String,
) -> Result<(), ShaderError> {
    for line in source.lines() {
        let Some(path) = include_target(line) else {
            out.push_str(line);
            out.push('\n');
            continue;
        };

        if stack.iter().any(|open| open == path) {
            return Err(ShaderError::IncludeCycle {
                path: path.to_string(),
            });
        }
        if !seen.insert(path.to_string()) {
            continue;
        }

        let text = includes.resolve(path)?;
        stack.push(path.to_string());
        expand(&text, includes, stack, seen, out)?;
        stack.pop();
    }
    Ok(())
}

/// `Some("file")` for `#include "file"`, ignoring surrounding whitespace.
fn include_target(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("#include")?
        .trim()
        .strip_prefix('"')?
        .strip_suffix('"')
}

/// Compiled shader modules by name.
///
/// With a shader directory configured, entry files and their includes are
/// read from disk; otherwise the embedded table is used.
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
    shader_dir: Option<PathBuf>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            shader_dir: None,
        }
    }

    pub fn with_shader_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shader_dir = Some(dir.into());
        self
    }

    /// Load `file`, preferring the shader directory over `embedded`.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        file: &str,
        embedded: &EmbeddedIncludes,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        match &self.shader_dir {
            Some(dir) => {
                let path = dir.join(file);
                debug!("Loading shader '{name}' from {}", path.display());
                let source = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => ShaderError::FileNotFound { path: path.clone() },
                    _ => ShaderError::Io(e),
                })?;
                let includes = DirIncludes::new(dir.clone());
                self.load_from_source(device, name, &source, &includes)
            }
            None => {
                let source = embedded.resolve(file)?;
                self.load_from_source(device, name, &source, embedded)
            }
        }
    }

    /// Preprocess and compile `source`, replacing any module cached as `name`.
    ///
    /// Compilation errors are logged with the module name and returned;
    /// warnings are only logged.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
        includes: &dyn IncludeSource,
    ) -> Result<Arc<wgpu::ShaderModule>, ShaderError> {
        let expanded = preprocess_includes(source, includes)?;
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(expanded.into()),
        });

        let info = pollster::block_on(module.get_compilation_info());
        let mut errors = Vec::new();
        for message in &info.messages {
            match message.message_type {
                wgpu::CompilationMessageType::Error => {
                    error!("Shader '{name}': {}", message.message);
                    errors.push(message.message.clone());
                }
                wgpu::CompilationMessageType::Warning => {
                    warn!("Shader '{name}': {}", message.message);
                }
                wgpu::CompilationMessageType::Info => {}
            }
        }
        if !errors.is_empty() {
            return Err(ShaderError::CompilationFailed {
                name: name.to_string(),
                message: errors.join("\n"),
            });
        }

        let module = Arc::new(module);
        if self.modules.insert(name.to_string(), module.clone()).is_some() {
            info!("Replaced shader '{name}'");
        } else {
            info!("Loaded shader '{name}'");
        }
        Ok(module)
    }

    pub fn get(&self, name: &str) -> Option<Arc<wgpu::ShaderModule>> {
        self.modules.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device;

    const VALID_SHADER: &str = r#"
        @vertex
        fn vs_main(@builtin(vertex_index) idx: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(helper(), 0.0, 0.0, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }

        #include "helper.wgsl"
    "#;

    const HELPER: &str = "fn helper() -> f32 { return 0.5; }";

    static TABLE: EmbeddedIncludes = EmbeddedIncludes(&[
        ("helper.wgsl", HELPER),
        ("a.wgsl", "// a\n#include \"b.wgsl\""),
        ("b.wgsl", "// b\n#include \"a.wgsl\""),
        ("common.wgsl", "const K: f32 = 1.0;"),
        ("left.wgsl", "#include \"common.wgsl\"\nfn left() {}"),
        ("right.wgsl", "#include \"common.wgsl\"\nfn right() {}"),
    ]);

    #[test]
    fn test_source_without_includes_is_unchanged() {
        let out = preprocess_includes("fn f() {}\nfn g() {}", &TABLE).unwrap();
        assert_eq!(out, "fn f() {}\nfn g() {}\n");
    }

    #[test]
    fn test_include_is_spliced_in_place() {
        let out = preprocess_includes("// top\n  #include \"helper.wgsl\"  \n// end", &TABLE).unwrap();
        assert_eq!(out, format!("// top\n{HELPER}\n// end\n"));
    }

    #[test]
    fn test_missing_include_names_path() {
        let err = preprocess_includes("#include \"nope.wgsl\"", &TABLE).unwrap_err();
        match err {
            ShaderError::IncludeNotFound { path } => assert_eq!(path, "nope.wgsl"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_include_cycle_is_rejected() {
        let err = preprocess_includes("#include \"a.wgsl\"", &TABLE).unwrap_err();
        assert!(matches!(err, ShaderError::IncludeCycle { .. }));
    }

    #[test]
    fn test_shared_include_is_spliced_once() {
        let out = preprocess_includes(
            "#include \"left.wgsl\"\n#include \"right.wgsl\"",
            &TABLE,
        )
        .unwrap();
        assert_eq!(out.matches("const K").count(), 1);
        assert!(out.contains("fn left()") && out.contains("fn right()"));
    }

    #[test]
    fn test_malformed_directive_is_left_alone() {
        let out = preprocess_includes("#include helper.wgsl", &TABLE).unwrap();
        assert_eq!(out, "#include helper.wgsl\n");
    }

    #[test]
    fn test_dir_includes_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lib.wgsl"), "fn lib() {}").unwrap();
        let includes = DirIncludes::new(dir.path());

        let out = preprocess_includes("#include \"lib.wgsl\"", &includes).unwrap();
        assert_eq!(out, "fn lib() {}\n");

        let err = preprocess_includes("#include \"gone.wgsl\"", &includes).unwrap_err();
        assert!(matches!(err, ShaderError::IncludeNotFound { path } if path == "gone.wgsl"));
    }

    #[test]
    fn test_library_starts_empty() {
        let library = ShaderLibrary::new();
        assert!(library.is_empty());
        assert!(library.get("missing").is_none());
    }

    #[test]
    fn test_load_with_includes_compiles() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mut library = ShaderLibrary::new();
        library
            .load_from_source(&device, "test", VALID_SHADER, &TABLE)
            .unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.get("test").is_some());
    }

    #[test]
    fn test_load_from_missing_dir_file() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let mut library = ShaderLibrary::new().with_shader_dir(dir.path());
        let result = library.load(&device, "planet", "planet.wgsl", &TABLE);
        assert!(matches!(result, Err(ShaderError::FileNotFound { .. })));
    }
}

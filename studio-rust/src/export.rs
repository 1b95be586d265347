use crate::ExportError;
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{Seek, Write},
    path::{Path, PathBuf},
};
use uigen::GeneratedArtifact;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

const FALLBACK_COMPONENT_NAME: &str = "Component";

#[derive(Serialize)]
struct PackageManifest {
    name: String,
    version: &'static str,
    private: bool,
    dependencies: Dependencies,
}

#[derive(Serialize)]
struct Dependencies {
    react: &'static str,
    #[serde(rename = "react-dom")]
    react_dom: &'static str,
    #[serde(rename = "lucide-react")]
    lucide_react: &'static str,
    clsx: &'static str,
    #[serde(rename = "tailwind-merge")]
    tailwind_merge: &'static str,
}

/// File-system safe component name: ASCII letters and digits only.
#[must_use]
pub fn component_file_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(char::is_ascii_alphanumeric).collect();
    if cleaned.is_empty() {
        FALLBACK_COMPONENT_NAME.to_string()
    } else {
        cleaned
    }
}

/// Write the component source as `<Name>.tsx`.
pub fn export_source(artifact: &GeneratedArtifact, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.tsx", component_file_name(&artifact.name)));
    write_file(&path, artifact.code.as_bytes())?;
    Ok(path)
}

/// Write the standalone preview document as `<Name>.html`.
pub fn export_preview(artifact: &GeneratedArtifact, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.html", component_file_name(&artifact.name)));
    write_file(&path, artifact.preview_html.as_bytes())?;
    Ok(path)
}

/// Write `<Name>-project.zip` holding the source, a package manifest and a
/// readme.
pub fn export_archive(artifact: &GeneratedArtifact, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!(
        "{}-project.zip",
        component_file_name(&artifact.name)
    ));
    ensure_dir(dir)?;
    let file = File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    write_archive(artifact, file)?;
    Ok(path)
}

/// Stream the project archive into `writer`.
pub fn write_archive<W: Write + Seek>(
    artifact: &GeneratedArtifact,
    writer: W,
) -> Result<W, ExportError> {
    let component_name = component_file_name(&artifact.name);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut zip = ZipWriter::new(writer);

    zip.start_file(format!("{component_name}.tsx"), options)?;
    zip.write_all(artifact.code.as_bytes())
        .map_err(zip::result::ZipError::Io)?;

    zip.start_file("package.json", options)?;
    zip.write_all(package_manifest(&component_name)?.as_bytes())
        .map_err(zip::result::ZipError::Io)?;

    zip.start_file("README.md", options)?;
    zip.write_all(readme(artifact).as_bytes())
        .map_err(zip::result::ZipError::Io)?;

    Ok(zip.finish()?)
}

fn package_manifest(component_name: &str) -> Result<String, ExportError> {
    let manifest = PackageManifest {
        name: component_name.to_lowercase(),
        version: "1.0.0",
        private: true,
        dependencies: Dependencies {
            react: "^18.2.0",
            react_dom: "^18.2.0",
            lucide_react: "^0.263.1",
            clsx: "^2.0.0",
            tailwind_merge: "^1.14.0",
        },
    };
    Ok(serde_json::to_string_pretty(&manifest)?)
}

fn readme(artifact: &GeneratedArtifact) -> String {
    format!(
        "# {}\n\n{}\n\nGenerated by UI Studio.",
        artifact.name, artifact.description
    )
}

fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    if let Some(dir) = path.parent() {
        ensure_dir(dir)?;
    }
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

use rayon::prelude::*;

use crate::catalog::graph::AssetCatalog;
use crate::catalog::model::Project;
use crate::foundation::error::{SketchError, SketchResult};

/// Module that only runs as part of its own project, never as a dependency.
pub const MAIN_MODULE: &str = "Main";

/// Outcome of decoding a project's images before activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImageReport {
    pub total: usize,
    /// Images that decoded to a 0x0 placeholder.
    pub failed: usize,
}

/// A project ready to hand to the execution engine.
#[derive(Clone, Debug)]
pub struct Activation {
    pub project: String,
    pub source: String,
    pub images: ImageReport,
}

/// Concatenate the script source of `name`: each direct dependency's modules in load order
/// (skipping `Main`), then the project's own modules including `Main`. Every module is followed
/// by a newline. Dependencies of dependencies are not expanded.
pub fn combined_source(catalog: &AssetCatalog, name: &str) -> SketchResult<String> {
    let project = catalog.require_project(name)?;
    let mut out = String::new();
    for dep in &project.dependencies {
        let dep_project = catalog.project(dep).ok_or_else(|| {
            SketchError::resolution(format!(
                "project '{name}' depends on unknown project '{dep}'"
            ))
        })?;
        append_modules(&mut out, dep_project, true)?;
    }
    append_modules(&mut out, project, false)?;
    Ok(out)
}

fn append_modules(out: &mut String, project: &Project, skip_main: bool) -> SketchResult<()> {
    for module in &project.load_order {
        if skip_main && module == MAIN_MODULE {
            continue;
        }
        let code = project.code.get(module).ok_or_else(|| {
            SketchError::resolution(format!(
                "module '{module}' of project '{}' is not in the archive",
                project.name
            ))
        })?;
        out.push_str(code);
        out.push('\n');
    }
    Ok(())
}

/// Decode every image of `project`, in parallel, and wait for all of them. Failures are
/// already logged by the decoder and leave 0x0 placeholders.
pub fn materialize_images(project: &Project) -> ImageReport {
    let decoded: Vec<(&String, u32, u32)> = project
        .images
        .par_iter()
        .map(|(name, asset)| {
            let img = asset.materialize();
            (name, img.width, img.height)
        })
        .collect();

    let mut report = ImageReport {
        total: decoded.len(),
        failed: 0,
    };
    for (name, w, h) in decoded {
        if w == 0 || h == 0 {
            report.failed += 1;
        } else {
            tracing::debug!("loaded {name} ({w}, {h})");
        }
    }
    tracing::info!("{} images loaded.", report.total);
    report
}

/// Build the combined source and decode the images of `name`.
#[tracing::instrument(skip(catalog))]
pub fn prepare(catalog: &AssetCatalog, name: &str) -> SketchResult<Activation> {
    tracing::info!("loading {name}...");
    let source = combined_source(catalog, name)?;
    let project = catalog.require_project(name)?;
    let images = materialize_images(project);
    tracing::info!("Loaded {} bytes.", source.len());
    Ok(Activation {
        project: name.to_string(),
        source,
        images,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/activate.rs"]
mod tests;

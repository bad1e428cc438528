use serde_json::json;
use std::path::PathBuf;

use crate::cli::manifest::load_manifest;
use crate::cli::utils::{format_route_tree, output_error, output_success};
use crate::cli::OutputFormat;
use crate::route::validate_route_structure;

pub async fn handle(manifest: PathBuf, output_format: OutputFormat) -> anyhow::Result<()> {
    let routes = match load_manifest(&manifest) {
        Ok(routes) => routes,
        Err(e) => {
            output_error(&output_format, &e.to_string(), Some(e.error_code()))?;
            return Err(e.into());
        }
    };

    let suspicious = routes
        .iter()
        .filter(|route| !validate_route_structure(route))
        .count();

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            &format!("Transformed {} routes", routes.len()),
            Some(json!({
                "routes": routes,
                "warnings": suspicious
            })),
        ),
        OutputFormat::Text => {
            print!("{}", format_route_tree(&routes));
            if suspicious > 0 {
                println!("{} top-level routes have structural warnings", suspicious);
            }
            output_success(
                &output_format,
                &format!("Transformed {} routes from {}", routes.len(), manifest.display()),
                None,
            )
        }
    }
}

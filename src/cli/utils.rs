use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::types::RouteDescriptor;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Render a descriptor tree, one route per line, children indented
pub fn format_route_tree(routes: &[RouteDescriptor]) -> String {
    let mut out = String::new();
    for route in routes {
        write_route(&mut out, route, 0);
    }
    out
}

fn write_route(out: &mut String, route: &RouteDescriptor, depth: usize) {
    let mut flags = Vec::new();
    match route.meta.requires_auth {
        Some(true) => flags.push("auth".to_string()),
        Some(false) => flags.push("public".to_string()),
        None => {}
    }
    if route.meta.skip_auth_check == Some(true) {
        flags.push("skip-auth".to_string());
    }
    if let Some(key) = &route.meta.permission_key {
        flags.push(format!("perm={}", key));
    }

    out.push_str(&format!(
        "{}{} {}{}\n",
        "  ".repeat(depth),
        route.path,
        route.name.as_deref().unwrap_or("<unnamed>"),
        if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        }
    ));

    for child in &route.children {
        write_route(out, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RouteMeta;

    #[test]
    fn test_route_tree_rendering() {
        let routes = vec![RouteDescriptor::new("System", "/system")
            .with_meta(RouteMeta::protected())
            .with_children(vec![RouteDescriptor::new("Roles", "roles")
                .with_meta(RouteMeta::protected().with_permission("roles"))])];

        assert_eq!(
            format_route_tree(&routes),
            "/system System [auth]\n  roles Roles [auth, perm=roles]\n"
        );
    }
}

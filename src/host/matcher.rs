use std::collections::BTreeMap;

use crate::host::{MatchedRecord, RouteLocation};
use crate::types::{is_catch_all_path, RouteDescriptor, RouteMeta};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

/// A route record flattened out of the descriptor tree with its ancestor chain
#[derive(Debug, Clone)]
pub struct CompiledRecord {
    pub full_path: String,
    pub name: Option<String>,
    pub redirect: Option<String>,
    chain: Vec<MatchedRecord>,
    segments: Vec<Segment>,
}

impl CompiledRecord {
    fn is_catch_all(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::CatchAll(_)))
    }

    fn static_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Static(_)))
            .count()
    }

    fn match_segments(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut idx = 0;

        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    if parts.get(idx) != Some(&expected.as_str()) {
                        return None;
                    }
                    idx += 1;
                }
                Segment::Param(name) => {
                    let value = parts.get(idx)?;
                    params.insert(name.clone(), (*value).to_string());
                    idx += 1;
                }
                Segment::CatchAll(name) => {
                    let rest = parts.get(idx..).unwrap_or_default().join("/");
                    params.insert(name.clone(), rest);
                    idx = parts.len();
                }
            }
        }

        (idx == parts.len()).then_some(params)
    }
}

/// Flatten a descriptor tree into matchable records, parents before children
pub fn compile(routes: &[RouteDescriptor]) -> Vec<CompiledRecord> {
    let mut records = Vec::new();
    for route in routes {
        compile_into(route, "", &[], &mut records);
    }
    records
}

fn compile_into(
    route: &RouteDescriptor,
    parent_path: &str,
    parent_chain: &[MatchedRecord],
    out: &mut Vec<CompiledRecord>,
) {
    let full_path = join_paths(parent_path, &route.path);

    let mut chain = parent_chain.to_vec();
    chain.push(MatchedRecord {
        name: route.name.clone(),
        path: full_path.clone(),
        meta: route.meta.clone(),
        catch_all: is_catch_all_path(&route.path),
    });

    out.push(CompiledRecord {
        segments: parse_segments(&full_path),
        full_path: full_path.clone(),
        name: route.name.clone(),
        redirect: route.redirect.clone(),
        chain: chain.clone(),
    });

    for child in &route.children {
        compile_into(child, &full_path, &chain, out);
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') || parent.is_empty() {
        return normalize_path(child);
    }
    if child.is_empty() {
        return normalize_path(parent);
    }
    normalize_path(&format!("{}/{}", parent.trim_end_matches('/'), child))
}

pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}

fn parse_segments(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some(param) => {
                let name = param
                    .split('(')
                    .next()
                    .unwrap_or(param)
                    .trim_end_matches(['*', '+', '?'])
                    .to_string();
                if param.contains("(.*)") || param.contains("(.+)") {
                    Segment::CatchAll(name)
                } else {
                    Segment::Param(name)
                }
            }
            None => Segment::Static(s.to_string()),
        })
        .collect()
}

/// Split `full_path` into the path part, dropping query and hash
fn split_path(full_path: &str) -> &str {
    let end = full_path.find(['?', '#']).unwrap_or(full_path.len());
    &full_path[..end]
}

/// Resolve a path against compiled records: static beats param beats wildcard
pub fn resolve(records: &[CompiledRecord], full_path: &str) -> RouteLocation {
    let full_path = if full_path.starts_with('/') {
        full_path.to_string()
    } else {
        format!("/{}", full_path)
    };
    let path = normalize_path(split_path(&full_path));
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut best: Option<(&CompiledRecord, BTreeMap<String, String>)> = None;
    for record in records {
        let Some(params) = record.match_segments(&parts) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some((current, _)) => rank(record) > rank(current),
        };
        if better {
            best = Some((record, params));
        }
    }

    match best {
        Some((record, params)) => {
            let meta = record
                .chain
                .iter()
                .fold(RouteMeta::default(), |acc, r| acc.merged_with(&r.meta));
            RouteLocation {
                path,
                full_path,
                name: record.name.clone(),
                params,
                matched: record.chain.clone(),
                meta,
                redirect: record.redirect.clone(),
            }
        }
        None => RouteLocation {
            path,
            full_path,
            name: None,
            params: BTreeMap::new(),
            matched: Vec::new(),
            meta: RouteMeta::default(),
            redirect: None,
        },
    }
}

fn rank(record: &CompiledRecord) -> (bool, usize) {
    (!record.is_catch_all(), record.static_count())
}

use std::io::{self, Write};

use serde::Serialize;

use minicluster_core::component::{Artifact, ComponentId, ComponentInstance, ComponentRegistry, LifecycleState};
use minicluster_core::orchestrator::{Outcomes, StartError, StopError};

/// One line per registered component: identity, artifact key, dependencies.
pub fn write_registry<W: Write>(out: &mut W, registry: &ComponentRegistry) -> io::Result<()> {
    if registry.is_empty() {
        return writeln!(out, "  No components registered.");
    }
    for descriptor in registry.iter() {
        let dependencies = if descriptor.dependencies().is_empty() {
            "-".to_string()
        } else {
            join(descriptor.dependencies())
        };
        writeln!(
            out,
            "  - {:<26} artifact key: {:<36} depends on: {}",
            descriptor.id(),
            descriptor.artifact_key(),
            dependencies
        )?;
    }
    Ok(())
}

pub fn write_order<W: Write>(out: &mut W, order: &[ComponentId]) -> io::Result<()> {
    for (position, id) in order.iter().enumerate() {
        writeln!(out, "{}. {}", position + 1, id)?;
    }
    Ok(())
}

/// State and adapter properties of each started component, the error of
/// each failed one.
pub fn write_start_report<W: Write>(
    out: &mut W,
    outcomes: &Outcomes<ComponentInstance, StartError>,
) -> io::Result<()> {
    for (id, result) in outcomes.iter() {
        match result {
            Ok(instance) => {
                writeln!(out, "{} {}", id, instance.state())?;
                if let Some(properties) = instance.properties() {
                    for line in properties.lines().map(str::trim).filter(|l| !l.is_empty()) {
                        writeln!(out, "    {}", line)?;
                    }
                }
            }
            Err(e) => writeln!(out, "{} FAILED: {}", id, e)?,
        }
    }
    Ok(())
}

pub fn write_stop_report<W: Write>(out: &mut W, outcomes: &Outcomes<(), StopError>) -> io::Result<()> {
    for (id, result) in outcomes.iter() {
        match result {
            Ok(()) => writeln!(out, "{} STOPPED", id)?,
            Err(e) => writeln!(out, "{} FAILED: {}", id, e)?,
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct StartEntry<'a> {
    identity: &'a ComponentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<LifecycleState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<&'a Artifact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StopEntry<'a> {
    identity: &'a ComponentId,
    stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// The start report as a single-line JSON array.
pub fn write_start_json<W: Write>(
    out: &mut W,
    outcomes: &Outcomes<ComponentInstance, StartError>,
) -> io::Result<()> {
    let properties: Vec<Option<String>> = outcomes
        .iter()
        .map(|(_, result)| result.as_ref().ok().and_then(ComponentInstance::properties))
        .collect();
    let entries: Vec<StartEntry<'_>> = outcomes
        .iter()
        .zip(&properties)
        .map(|((identity, result), properties)| match result {
            Ok(instance) => StartEntry {
                identity,
                state: Some(instance.state()),
                artifact: instance.artifact(),
                properties: properties
                    .as_deref()
                    .map(|p| p.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
                    .unwrap_or_default(),
                error: None,
            },
            Err(e) => StartEntry {
                identity,
                state: None,
                artifact: None,
                properties: Vec::new(),
                error: Some(e.to_string()),
            },
        })
        .collect();
    serde_json::to_writer(&mut *out, &entries)?;
    writeln!(out)
}

/// The stop report as a single-line JSON array.
pub fn write_stop_json<W: Write>(out: &mut W, outcomes: &Outcomes<(), StopError>) -> io::Result<()> {
    let entries: Vec<StopEntry<'_>> = outcomes
        .iter()
        .map(|(identity, result)| StopEntry {
            identity,
            stopped: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
        })
        .collect();
    serde_json::to_writer(&mut *out, &entries)?;
    writeln!(out)
}

fn join(ids: &[ComponentId]) -> String {
    ids.iter().map(ComponentId::as_str).collect::<Vec<_>>().join(", ")
}

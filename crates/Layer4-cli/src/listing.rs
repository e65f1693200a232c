//! `kiln plugins` / `kiln contributions` / `kiln run`

use kiln_core::plugin::builtin::BuiltinView;
use kiln_core::{CommandSection, PluginHost, ViewContribution};
use serde_json::Value;

pub fn print_plugins(host: &PluginHost) {
    let plugins = host.plugins();
    if plugins.is_empty() {
        println!("No plugins registered.");
        return;
    }

    println!("Plugins:");
    for info in &plugins {
        let manifest = &info.manifest;
        println!(
            "  {:<9} {} v{} - {}{}",
            info.status.to_string(),
            manifest.id,
            manifest.version,
            manifest.name,
            if manifest.description.is_empty() {
                String::new()
            } else {
                format!(": {}", manifest.description)
            }
        );
    }

    let summary = host.summary();
    println!(
        "\n{} total, {} active, {} inactive, {} failed, {} disabled",
        summary.total, summary.active, summary.inactive, summary.failed, summary.disabled
    );
}

pub fn print_contributions(host: &PluginHost) {
    let commands = host.commands();
    println!("Commands ({}):", commands.len());
    for section in [CommandSection::Core, CommandSection::Navigation, CommandSection::Plugin] {
        let in_section: Vec<_> = commands.iter().filter(|c| c.section == section).collect();
        if in_section.is_empty() {
            continue;
        }
        println!("  [{}]", section);
        for command in in_section {
            println!("    {:<24} {}", command.id, command.label);
        }
    }

    print_views("Sidebar views", &host.sidebar_views());
    print_views("Panel views", &host.panel_views());

    let providers = host.diagnostic_providers();
    println!("\nDiagnostic providers ({}):", providers.len());
    for provider in &providers {
        println!("  {}", provider.name());
    }
}

fn print_views(title: &str, views: &[ViewContribution]) {
    println!("\n{} ({}):", title, views.len());
    for view in views {
        let component = view
            .component
            .downcast_ref::<BuiltinView>()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "external".to_string());
        println!("  {:<24} {} <{}>", view.id, view.title, component);
    }
}

/// 명령 인자 파싱. JSON으로 읽히지 않으면 문자열
pub fn parse_args(raw: &[String]) -> Vec<Value> {
    raw.iter()
        .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
        .collect()
}

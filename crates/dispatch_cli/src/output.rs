use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use dispatch_engine::{
    Binding, Contract, ContractRegistry, DispatchError, InvocationResult, SelectionResult,
};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn print_check_summary(registry: &ContractRegistry, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&json!({
            "valid": true,
            "tools": registry.tools().count(),
            "components": registry.components().count(),
            "contracts": registry.contracts().map(contract_json).collect::<Vec<_>>(),
        })),
        OutputFormat::Text => print_text_summary(registry),
    }
}

fn print_text_summary(registry: &ContractRegistry) {
    print_success("Declarations are valid");

    println!("\nRegistry Summary:");
    println!("  Tools:       {}", registry.tools().count());
    println!("  Components:  {}", registry.components().count());

    if registry.tools().count() > 0 {
        println!("\n{}", "Tools:".bold());
        for contract in registry.tools() {
            println!("  {}", contract.name().bold());
            if let Binding::Tool(tool) = contract.binding() {
                println!("    Handler:   {}", tool.handler_ref);
                if tool.policy.retry.max_retries > 0 {
                    println!(
                        "    Retry:     {} x {}ms backoff",
                        tool.policy.retry.max_retries, tool.policy.retry.backoff_ms
                    );
                }
                if let Some(timeout) = tool.policy.timeout {
                    println!("    Timeout:   {}ms", timeout.as_millis());
                }
                if tool.policy.fallback.is_some() {
                    println!("    Fallback:  {}", "declared".yellow());
                }
            }
        }
    }

    if registry.components().count() > 0 {
        println!("\n{}", "Components:".bold());
        for contract in registry.components() {
            if let Binding::Component(component) = contract.binding() {
                println!("  {} → {}", contract.name().bold(), component.renderer);
            }
        }
    }
}

pub fn print_contract_list(contracts: &[&Contract], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&Value::Array(
            contracts.iter().map(|contract| contract_json(contract)).collect(),
        )),
        OutputFormat::Text => {
            if contracts.is_empty() {
                print_info("No contracts registered");
                return;
            }
            for contract in contracts {
                println!(
                    "{:<28} {:<10} {}",
                    contract.name().bold(),
                    contract.kind().to_string().cyan(),
                    first_line(contract.description())
                );
            }
        }
    }
}

fn contract_json(contract: &Contract) -> Value {
    let mut value = json!({
        "name": contract.name(),
        "kind": contract.kind(),
        "description": contract.description(),
    });
    match contract.binding() {
        Binding::Tool(tool) => {
            value["handler"] = json!(tool.handler_ref);
            value["fallback"] = json!(tool.policy.fallback.is_some());
        }
        Binding::Component(component) => {
            value["renderer"] = json!(component.renderer);
        }
    }
    value
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

pub fn print_invocation(name: &str, result: &InvocationResult, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match (result.value(), result.error()) {
        (Some(value), _) => {
            if result.is_degraded() {
                print_warning(&format!("{name} failed; showing fallback data"));
            } else {
                print_success(&format!("{name} returned live data"));
            }
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        (None, Some(err)) => print_dispatch_error(err),
        (None, None) => {}
    }
    Ok(())
}

pub fn print_selection(name: &str, result: &SelectionResult, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match (result.descriptor(), result.error()) {
        (Some(descriptor), _) => {
            print_success(&format!("{name} → {}", descriptor.renderer));
            println!("{}", serde_json::to_string_pretty(&descriptor.props)?);
        }
        (None, Some(err)) => print_dispatch_error(err),
        (None, None) => {}
    }
    Ok(())
}

fn print_dispatch_error(err: &DispatchError) {
    print_error(&format!("[{}] {}", err.kind(), err));
    if let Some(details) = err.validation() {
        eprintln!("  Field: {}", details.field());
    }
}

fn print_json(value: &Value) {
    // Serializing a Value cannot fail
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

use clamp_tools::ToolRegistry;

pub fn run(tools: &ToolRegistry, name: Option<&str>) -> anyhow::Result<()> {
    match name {
        Some(name) => print_tool_detail(tools, name)?,
        None => print_tool_list(tools),
    }

    Ok(())
}

fn print_tool_list(tools: &ToolRegistry) {
    let names = tools.names();

    println!("Loaded tools ({}):", names.len());
    for name in names {
        let Some(tool) = tools.get(&name) else {
            continue;
        };
        println!("{name} [{}] - {}", tool.kind(), tool.description());
    }
}

fn print_tool_detail(tools: &ToolRegistry, name: &str) -> anyhow::Result<()> {
    let tool = tools
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown tool: {name}"))?;
    let schema = serde_json::to_string_pretty(&tool.parameters_schema())?;

    println!("name: {}", tool.name());
    println!("kind: {}", tool.kind());
    println!("label: {}", tool.label());
    println!("description: {}", tool.description());
    println!("parameters:");
    println!("{schema}");

    Ok(())
}

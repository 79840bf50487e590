use clamp_tools::{ToolContext, ToolRegistry};
use serde_json::{json, Value};

/// Flags for `clamp invoke`.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    pub args: String,
    pub limit: Option<String>,
    pub regexp: Option<String>,
    pub metadata: bool,
}

pub async fn run(tools: &ToolRegistry, name: &str, options: InvokeOptions) -> anyhow::Result<()> {
    let tool = tools
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown tool: {name}"))?;

    let args = parse_args(&options.args)?;
    validate_args(&tool.parameters_schema(), &args).map_err(|e| anyhow::anyhow!(e))?;
    let args = with_call_params(args, options.limit.as_deref(), options.regexp.as_deref());

    let ctx = ToolContext::new(cli_session_id());
    let result = tool.execute(args, &ctx).await?;

    if options.metadata {
        let envelope = json!({
            "tool": tool.name(),
            "output": result.output,
            "metadata": result.metadata,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        println!("{}", result.output);
    }

    Ok(())
}

fn cli_session_id() -> String {
    format!("cli-{}", std::process::id())
}

fn parse_args(raw: &str) -> anyhow::Result<Value> {
    let args: Value = serde_json::from_str(raw)
        .map_err(|e| anyhow::anyhow!("--args is not valid JSON: {e}"))?;
    if !args.is_object() {
        anyhow::bail!("--args must be a JSON object");
    }
    Ok(args)
}

/// Fold `--limit` / `--regexp` into the argument object, where the tool
/// picks them up as per-call overrides.
fn with_call_params(mut args: Value, limit: Option<&str>, regexp: Option<&str>) -> Value {
    if let Some(map) = args.as_object_mut() {
        if let Some(limit) = limit {
            let value = limit
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(limit.to_string()));
            map.insert("limit".to_string(), value);
        }
        if let Some(regexp) = regexp {
            map.insert("regexp".to_string(), Value::String(regexp.to_string()));
        }
    }
    args
}

fn validate_args(schema: &Value, args: &Value) -> Result<(), String> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| format!("invalid tool schema: {e}"))?;

    let mut errors = validator
        .iter_errors(args)
        .map(|e| e.to_string())
        .collect::<Vec<_>>();
    if errors.is_empty() {
        Ok(())
    } else {
        errors.sort();
        Err(format!("argument validation failed: {}", errors.join("; ")))
    }
}

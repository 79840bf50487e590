//! Figma toolkit: files, nodes, comments, images, team projects.

use crate::config::{ToolConfig, ToolSettings};
use crate::credentials::{resolve_credential, TokenScheme};
use crate::error::ToolError;
use crate::facade::{BoundedTool, Endpoint};
use crate::params::LimitValue;
use crate::path::path_segment;
use crate::toolkit::Toolkit;
use clamp_client::{ApiRequest, HttpSource, HttpSourceConfig, ResponseSource};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const FIGMA_API_BASE: &str = "https://api.figma.com/v1";
pub const FIGMA_TOKEN_HEADER: &str = "X-Figma-Token";
pub const FIGMA_KIND: &str = "figma";

/// Default filter: drops geometry, layout and style keys with scalar values,
/// which dominate Figma node payloads and carry little meaning for a model.
pub const DEFAULT_FIGMA_REGEXP: &str = concat!(
    r#"("id"|"componentId"|"blendMode"|"scrollBehavior"|"thumbnailUrl"|"r"|"g"|"b"|"a"|"x"|"y"|"#,
    r#""width"|"height"|"strokeWeight"|"strokeAlign"|"strokeJoin"|"strokeCap"|"stroke"|"#,
    r#""vertical"|"horizontal"|"clipsContent"|"layoutAlign"|"layoutGrow"|"#,
    r#""layoutSizingHorizontal"|"layoutSizingVertical"|"fill"|"text"|"effect"|"#,
    r#""startingAngle"|"endingAngle"|"innerRadius"|"cornerRadius"|"cornerSmoothing"|"#,
    r#""layoutMode"|"counterAxisSizingMode"|"itemSpacing"|"primaryAxisSizingMode"|"#,
    r#""counterAxisAlignItems"|"primaryAxisAlignItems"|"paddingLeft"|"paddingRight"|"#,
    r#""paddingTop"|"paddingBottom"|"layoutWrap"|"key"|"description"|"styleType"|"remote"|"#,
    r#""componentSetId"|"fontFamily"|"fontPostScriptName"|"fontWeight"|"textCase"|"#,
    r#""textAutoResize"|"fontSize"|"textAlignHorizontal"|"textAlignVertical"|"letterSpacing"|"#,
    r#""lineHeightPx"|"lineHeightPercent"|"lineHeightUnit"|"strokes"|"fills")"#,
    r#"\s*:\s*("(?:[^"\\]|\\.)*"|[^\s,{}\[\]]+)\s*,?"#
);

/// Bounding overrides accepted by every Figma tool.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct BoundParams {
    /// Sets the maximum length of the output, in characters. Default: 10000.
    #[serde(default)]
    pub limit: Option<LimitValue>,
    /// Regex pattern; every match is removed from the response before truncation.
    #[serde(default)]
    pub regexp: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FileNodesParams {
    /// File key (e.g. `Fp24FuzPwH0L74ODSrCnQo`).
    pub file_key: String,
    /// Comma-separated node ids (e.g. `8:6,1:7`).
    pub ids: String,
    #[serde(flatten)]
    pub bounds: BoundParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FileParams {
    /// File key.
    pub file_key: String,
    /// Set to `paths` to export vector data.
    #[serde(default)]
    pub geometry: Option<String>,
    /// Version of the file.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub bounds: BoundParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FileKeyParams {
    /// File key.
    pub file_key: String,
    #[serde(flatten)]
    pub bounds: BoundParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FileCommentParams {
    /// File key.
    pub file_key: String,
    /// Message for the comment.
    pub message: String,
    /// Positioning of the comment (Vector, FrameOffset, Region, FrameOffsetRegion).
    #[serde(default)]
    pub client_meta: Option<Value>,
    #[serde(flatten)]
    pub bounds: BoundParams,
}

fn default_image_ids() -> String {
    "0:0".to_string()
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FileImagesParams {
    /// File key.
    pub file_key: String,
    /// Comma-separated node ids to render. Default: `0:0`.
    #[serde(default = "default_image_ids")]
    pub ids: String,
    /// Image scaling factor between 0.01 and 4.
    #[serde(default)]
    pub scale: Option<String>,
    /// Output format: jpg, png, svg or pdf.
    #[serde(default)]
    pub format: Option<String>,
    /// Specific version id to render.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub bounds: BoundParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TeamProjectsParams {
    /// Team id (e.g. `1101853299713989222`).
    pub team_id: String,
    #[serde(flatten)]
    pub bounds: BoundParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ProjectFilesParams {
    /// Project id (e.g. `55391681`).
    pub project_id: String,
    #[serde(flatten)]
    pub bounds: BoundParams,
}

fn schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).expect("schema serialization should not fail")
}

fn parse<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    serde_json::from_value(args.clone()).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

/// All Figma operations, in the order they are exposed.
pub fn figma_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new(
            "get_file_nodes",
            "Get File Nodes",
            "Reads the specified nodes of a Figma file by file key.",
            schema::<FileNodesParams>(),
            |args| {
                let p: FileNodesParams = parse(args)?;
                let key = path_segment("file_key", &p.file_key)?;
                Ok(ApiRequest::get(format!("files/{key}/nodes")).query("ids", p.ids))
            },
        ),
        Endpoint::new(
            "get_file",
            "Get File",
            "Reads a Figma file by file key.",
            schema::<FileParams>(),
            |args| {
                let p: FileParams = parse(args)?;
                let key = path_segment("file_key", &p.file_key)?;
                Ok(ApiRequest::get(format!("files/{key}"))
                    .query_opt("geometry", p.geometry)
                    .query_opt("version", p.version))
            },
        ),
        Endpoint::new(
            "get_file_versions",
            "Get File Versions",
            "Retrieves the version history of a Figma file.",
            schema::<FileKeyParams>(),
            |args| {
                let p: FileKeyParams = parse(args)?;
                let key = path_segment("file_key", &p.file_key)?;
                Ok(ApiRequest::get(format!("files/{key}/versions")))
            },
        ),
        Endpoint::new(
            "get_file_comments",
            "Get File Comments",
            "Retrieves the comments on a Figma file.",
            schema::<FileKeyParams>(),
            |args| {
                let p: FileKeyParams = parse(args)?;
                let key = path_segment("file_key", &p.file_key)?;
                Ok(ApiRequest::get(format!("files/{key}/comments")))
            },
        ),
        Endpoint::new(
            "post_file_comment",
            "Post File Comment",
            "Posts a comment to a Figma file.",
            schema::<FileCommentParams>(),
            |args| {
                let p: FileCommentParams = parse(args)?;
                let key = path_segment("file_key", &p.file_key)?;
                if p.message.trim().is_empty() {
                    return Err(ToolError::InvalidParameters(
                        "message must not be empty".to_string(),
                    ));
                }
                let mut body = json!({ "message": p.message });
                if let Some(meta) = p.client_meta {
                    body["client_meta"] = meta;
                }
                Ok(ApiRequest::post(format!("files/{key}/comments")).json(body))
            },
        ),
        Endpoint::new(
            "get_file_images",
            "Get File Images",
            "Fetches URLs of server-rendered images for nodes of a Figma file.",
            schema::<FileImagesParams>(),
            |args| {
                let p: FileImagesParams = parse(args)?;
                let key = path_segment("file_key", &p.file_key)?;
                Ok(ApiRequest::get(format!("images/{key}"))
                    .query("ids", p.ids)
                    .query_opt("scale", p.scale)
                    .query_opt("format", p.format)
                    .query_opt("version", p.version))
            },
        ),
        Endpoint::new(
            "get_team_projects",
            "Get Team Projects",
            "Lists all projects of a Figma team.",
            schema::<TeamProjectsParams>(),
            |args| {
                let p: TeamProjectsParams = parse(args)?;
                let team = path_segment("team_id", &p.team_id)?;
                Ok(ApiRequest::get(format!("teams/{team}/projects")))
            },
        ),
        Endpoint::new(
            "get_project_files",
            "Get Project Files",
            "Lists all files of a Figma project.",
            schema::<ProjectFilesParams>(),
            |args| {
                let p: ProjectFilesParams = parse(args)?;
                let project = path_segment("project_id", &p.project_id)?;
                Ok(ApiRequest::get(format!("projects/{project}/files")))
            },
        ),
    ]
}

/// Validated Figma configuration: token goes in `X-Figma-Token`, OAuth2 as
/// a bearer token, and the noise filter applies unless `global_regexp` is set
/// (an empty string turns filtering off).
pub fn figma_config(settings: &ToolSettings) -> Result<ToolConfig, ToolError> {
    let mut settings = settings.clone();
    if settings.global_regexp.is_none() {
        settings.global_regexp = Some(DEFAULT_FIGMA_REGEXP.to_string());
    }
    Ok(ToolConfig::from_settings(&settings)?
        .with_token_scheme(TokenScheme::Header(FIGMA_TOKEN_HEADER.to_string())))
}

/// HTTP source pointed at the public Figma API.
pub fn figma_source(timeout: Duration) -> Result<HttpSource, ToolError> {
    Ok(HttpSource::new(
        HttpSourceConfig::new("figma", FIGMA_API_BASE).with_timeout(timeout),
    )?)
}

/// Build the Figma toolkit over any response source.
///
/// The credential is checked here so a misconfigured toolkit fails when it
/// is loaded rather than on its first call.
pub fn figma_toolkit(
    settings: &ToolSettings,
    source: Arc<dyn ResponseSource>,
    name: Option<&str>,
    selected: &[String],
) -> Result<Toolkit, ToolError> {
    let config = Arc::new(figma_config(settings)?);
    resolve_credential(&config)?;

    let tools = figma_endpoints()
        .into_iter()
        .map(|endpoint| {
            BoundedTool::new(config.clone(), endpoint, source.clone()).with_kind(FIGMA_KIND)
        })
        .collect();
    let toolkit = Toolkit::new(name, tools, selected)?;
    tracing::debug!(tools = toolkit.tools().len(), "figma toolkit ready");
    Ok(toolkit)
}

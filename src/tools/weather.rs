use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{error::ToolError, tools::{LooperTool, ToolContext}};

const FAILURE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetWeather {
    pub city: String,
}

impl GetWeather {
    async fn fetch(&self, ctx: &ToolContext) -> Result<String, reqwest::Error> {
        let url = format!("{}/{}?format=%C+%t", ctx.weather_url, self.city);
        let response = ctx.http.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            tracing::warn!(status = %response.status(), %url, "weather lookup refused");
            return Ok(FAILURE.to_string());
        }

        let body = response.text().await?;
        Ok(format!("The weather in {} is {}.", self.city, body.trim()))
    }
}

#[async_trait]
impl LooperTool for GetWeather {
    fn activity(&self) -> &'static str {
        "getting weather"
    }

    // Network trouble collapses into the same fixed reply as a bad status.
    async fn execute(&self, ctx: &mut ToolContext) -> Result<String, ToolError> {
        match self.fetch(ctx).await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::warn!(error = %e, city = %self.city, "weather lookup failed");
                Ok(FAILURE.to_string())
            }
        }
    }
}

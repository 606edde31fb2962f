//
//  sonar-web-api
//  cli/measure.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Measure commands

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;

use crate::api::measures::{Measure, MeasuresAndMeta, MeasuresRequest, ProjectMeasure};
use crate::api::RequestData;
use crate::config::Config;
use crate::output::{format_status, OutputWriter, TableBuilder, TableOutput};

use super::GlobalOptions;

/// Read measures
#[derive(Args, Debug)]
pub struct MeasureCommand {
    #[command(subcommand)]
    pub command: MeasureSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MeasureSubcommand {
    /// Show metric values of a component
    Get(GetArgs),

    /// Show metric values with component, metric definitions and periods
    Meta(MetaArgs),

    /// Show metric values of several projects
    Projects(ProjectsArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Component key (defaults to the project)
    pub component: Option<String>,

    /// Metric keys
    #[arg(long = "metric", short = 'm', required = true, value_delimiter = ',')]
    pub metrics: Vec<String>,

    /// Branch name
    #[arg(long, short = 'b', conflicts_with = "pull_request")]
    pub branch: Option<String>,

    /// Pull request id
    #[arg(long)]
    pub pull_request: Option<String>,
}

#[derive(Args, Debug)]
pub struct MetaArgs {
    /// Component key (defaults to the project)
    pub component: Option<String>,

    /// Metric keys
    #[arg(long = "metric", short = 'm', required = true, value_delimiter = ',')]
    pub metrics: Vec<String>,

    /// Extra request parameter as KEY=VALUE
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Project keys
    #[arg(long = "projects", short = 'P', required = true, value_delimiter = ',')]
    pub projects: Vec<String>,

    /// Metric keys
    #[arg(long = "metric", short = 'm', required = true, value_delimiter = ',')]
    pub metrics: Vec<String>,
}

fn parse_param(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err(anyhow!("parameter name cannot be empty"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Serialize)]
#[serde(transparent)]
struct MeasureList(Vec<Measure>);

impl TableOutput for MeasureList {
    fn print_table(&self, color: bool) {
        if self.0.is_empty() {
            println!("No measures found.");
            return;
        }

        let rows = self.0.iter().map(|m| {
            [
                m.metric.clone(),
                render_value(&m.metric, m.value.as_deref(), color),
                m.period_value(1).unwrap_or("-").to_string(),
            ]
        });

        TableBuilder::new()
            .color(color)
            .headers(["Metric", "Value", "Leak period"])
            .rows(rows)
            .print();
    }
}

impl TableOutput for MeasuresAndMeta {
    fn print_table(&self, color: bool) {
        let component = &self.component;
        let title = format!("{} ({})", component.name, component.key);
        if color {
            println!("{}", style(title).bold());
        } else {
            println!("{}", title);
        }
        if let Some(description) = &component.description {
            println!("{}", description);
        }
        println!();

        let metric_name = |key: &str| {
            self.metrics
                .iter()
                .flatten()
                .find(|m| m.key == key)
                .map(|m| (m.name.clone(), m.metric_type.clone()))
                .unwrap_or_else(|| (key.to_string(), "-".to_string()))
        };

        let rows = component.measures.iter().map(|m| {
            let (name, metric_type) = metric_name(&m.metric);
            [
                name,
                metric_type,
                render_value(&m.metric, m.value.as_deref(), color),
            ]
        });

        TableBuilder::new()
            .color(color)
            .headers(["Metric", "Type", "Value"])
            .rows(rows)
            .print();

        for period in self.periods.iter().flatten() {
            let date = period
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "Period {}: {} {} ({})",
                period.index,
                period.mode,
                period.parameter.as_deref().unwrap_or(""),
                date
            );
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct ProjectMeasureList(Vec<ProjectMeasure>);

impl TableOutput for ProjectMeasureList {
    fn print_table(&self, color: bool) {
        if self.0.is_empty() {
            println!("No measures found.");
            return;
        }

        let rows = self.0.iter().map(|m| {
            [
                m.component.clone(),
                m.metric.clone(),
                render_value(&m.metric, m.value.as_deref(), color),
            ]
        });

        TableBuilder::new()
            .color(color)
            .headers(["Project", "Metric", "Value"])
            .rows(rows)
            .print();
    }
}

fn render_value(metric: &str, value: Option<&str>, color: bool) -> String {
    match value {
        Some(v) if metric == "alert_status" => format_status(v, color),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

impl MeasureCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = Config::load()?;
        let client = global.client(&config)?;
        let writer = OutputWriter::from_flag(global.json);

        match &self.command {
            MeasureSubcommand::Get(args) => {
                let component = component_or_project(args.component.as_ref(), &config, global)?;
                let mut request = MeasuresRequest::new(component, args.metrics.iter().cloned());
                request.branch = args.branch.clone();
                request.pull_request = args.pull_request.clone();

                let measures = client.get_measures(&request).await?;
                writer.write(&MeasureList(measures))
            }
            MeasureSubcommand::Meta(args) => {
                let component = component_or_project(args.component.as_ref(), &config, global)?;
                let mut additional: RequestData = args.params.iter().cloned().collect();
                additional
                    .entry("additionalFields".to_string())
                    .or_insert_with(|| "metrics,periods".to_string());

                let envelope = client
                    .get_measures_and_meta(&component, &args.metrics, additional)
                    .await?;
                writer.write(&envelope)
            }
            MeasureSubcommand::Projects(args) => {
                let measures = client
                    .get_measures_for_projects(&args.projects, &args.metrics)
                    .await?;
                writer.write(&ProjectMeasureList(measures))
            }
        }
    }
}

fn component_or_project(
    component: Option<&String>,
    config: &Config,
    global: &GlobalOptions,
) -> Result<String> {
    match component {
        Some(c) => Ok(c.clone()),
        None => global.project(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("additionalFields=metrics").unwrap(),
            ("additionalFields".to_string(), "metrics".to_string())
        );
        assert_eq!(parse_param("branch=a=b").unwrap().1, "a=b");
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value("bugs", None, false), "-");
        assert_eq!(render_value("alert_status", Some("OK"), false), "OK");
    }
}

//! Timetable Server Client
//!
//! Lists programs and branches and downloads the timetable markup of a branch.

use std::sync::LazyLock;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::AppConfig;

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<option value="(.*?)">(.*?)</option>"#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    #[serde(rename = "branch_id", deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// A group of a branch together with its 1-based position in the server's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub index: usize,
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct BranchesResponse {
    result: Option<(Value, Vec<Branch>)>,
}

#[derive(Debug, Deserialize)]
struct GroupsResponse {
    groups: Option<Vec<GroupRecord>>,
}

#[derive(Debug, Deserialize)]
struct GroupRecord {
    #[serde(deserialize_with = "string_or_number")]
    groups_id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected an id, got {}", other))),
    }
}

pub struct TimetableClient {
    client: Client,
    timetable_url: String,
    branches_url: String,
    groups_url: String,
}

impl TimetableClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        info!("Creating HTTP client");
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            timetable_url: config.timetable_url.clone(),
            branches_url: config.branches_url.clone(),
            groups_url: config.groups_url.clone(),
        })
    }

    /// Study programs offered on the timetable page.
    pub fn programs(&self) -> Result<Vec<Program>> {
        info!("Fetching programs from {}", self.timetable_url);
        let body = self.get(&self.timetable_url, &[])?;
        parse_programs(&body)
    }

    pub fn branches(&self, program_id: &str, year: &str) -> Result<Vec<Branch>> {
        info!("Fetching branches of program {} year {}", program_id, year);
        let body = self.get(
            &self.branches_url,
            &[("type", "year"), ("program_id", program_id), ("year", year)],
        )?;
        parse_branches(&body)
    }

    pub fn groups(&self, branch_id: &str) -> Result<Vec<Group>> {
        info!("Fetching groups of branch {}", branch_id);
        let body = self.get(&self.groups_url, &[("type", "branch"), ("branch_id", branch_id)])?;
        parse_groups(&body)
    }

    /// Downloads the generated timetable markup of every group in a branch.
    pub fn timetable(&self, date: &str, program_id: &str, year: &str, branch_id: &str) -> Result<String> {
        let groups = self.groups(branch_id)?;
        if groups.is_empty() {
            bail!("Branch {} has no groups", branch_id);
        }

        let form_body = timetable_form(date, program_id, year, branch_id, &groups);
        info!("Requesting timetable from {}", self.timetable_url);
        let response = self
            .client
            .post(&self.timetable_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form_body)
            .send()
            .context("Failed to request timetable")?
            .error_for_status()
            .context("Timetable request was rejected")?;

        let body = response.text().context("Failed to read timetable response")?;
        if body.is_empty() {
            bail!("Empty response");
        }
        Ok(body)
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} was rejected", url))?;

        response
            .text()
            .with_context(|| format!("Failed to read response from {}", url))
    }
}

fn timetable_form(date: &str, program_id: &str, year: &str, branch_id: &str, groups: &[Group]) -> String {
    let indices = groups
        .iter()
        .map(|g| g.index.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let values = groups.iter().map(|g| g.id.as_str()).collect::<Vec<_>>().join(",");

    format!(
        "date_field={}&program_index={}&year_index={}&branch_id={}&with_groups=1&groups_index={}&groups_values={}",
        urlencoding::encode(date),
        urlencoding::encode(program_id),
        urlencoding::encode(year),
        urlencoding::encode(branch_id),
        urlencoding::encode(&indices),
        urlencoding::encode(&values),
    )
}

pub fn parse_programs(body: &str) -> Result<Vec<Program>> {
    if body.is_empty() {
        bail!("Empty response");
    }

    let programs: Vec<Program> = OPTION_RE
        .captures_iter(body)
        .map(|caps| Program {
            id: caps[1].to_string(),
            name: caps[2].to_string(),
        })
        .collect();

    if programs.is_empty() {
        bail!("Invalid response");
    }
    Ok(programs)
}

pub fn parse_branches(body: &str) -> Result<Vec<Branch>> {
    if body.is_empty() {
        bail!("Empty response");
    }

    let response: BranchesResponse =
        serde_json::from_str(body).context("Failed to parse branches response")?;
    match response.result {
        Some((_, branches)) if !branches.is_empty() => Ok(branches),
        _ => Err(anyhow!("Invalid response")),
    }
}

pub fn parse_groups(body: &str) -> Result<Vec<Group>> {
    let response: GroupsResponse =
        serde_json::from_str(body).context("Failed to parse groups response")?;

    Ok(response
        .groups
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, record)| Group {
            index: i + 1,
            id: record.groups_id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programs_come_from_select_options() {
        let body = r#"<select><option value="7">Informatika</option><option value="12">Elektrotehnika</option></select>"#;
        let programs = parse_programs(body).unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[1], Program { id: "12".into(), name: "Elektrotehnika".into() });
    }

    #[test]
    fn programs_require_options() {
        assert!(parse_programs("").is_err());
        assert!(parse_programs("<html></html>").is_err());
    }

    #[test]
    fn branches_accept_numeric_ids() {
        let body = r#"{"result": [1, [{"branch_id": 301, "name": "RIT UN"}, {"branch_id": "302", "name": "RIT VS"}]]}"#;
        let branches = parse_branches(body).unwrap();
        assert_eq!(branches[0].id, "301");
        assert_eq!(branches[1].id, "302");
        assert_eq!(branches[1].name, "RIT VS");
    }

    #[test]
    fn branches_without_result_are_invalid() {
        assert!(parse_branches(r#"{"error": "nope"}"#).is_err());
        assert!(parse_branches(r#"{"result": [1, []]}"#).is_err());
        assert!(parse_branches("not json").is_err());
    }

    #[test]
    fn groups_are_numbered_from_one() {
        let groups = parse_groups(r#"{"groups": [{"groups_id": 55}, {"groups_id": "56"}]}"#).unwrap();
        assert_eq!(groups, vec![Group { index: 1, id: "55".into() }, Group { index: 2, id: "56".into() }]);
        assert!(parse_groups("{}").unwrap().is_empty());
    }

    #[test]
    fn timetable_form_lists_groups() {
        let groups = vec![Group { index: 1, id: "55".into() }, Group { index: 2, id: "56".into() }];
        let form = timetable_form("3.3.2025", "7", "2", "301", &groups);
        assert_eq!(
            form,
            "date_field=3.3.2025&program_index=7&year_index=2&branch_id=301&with_groups=1&groups_index=1%2C2&groups_values=55%2C56"
        );
    }
}

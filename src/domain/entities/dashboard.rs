use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub projects: usize,
    pub blogs: usize,
    pub messages: usize,
    pub skills: usize,
    /// Completed projects as a whole percentage of all projects.
    pub completion_rate: u8,
}

/// One bar or slice of an overview chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    /// Short label, e.g. `Jan 5`.
    pub name: String,
    pub value: usize,
    pub full_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub date: String,
    pub time: String,
    pub time_ago: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub stats: Stats,
    pub messages_by_date: Vec<DailyCount>,
    pub projects_by_month: Vec<ChartPoint>,
    pub skills_by_category: Vec<ChartPoint>,
    pub recent_messages: Vec<RecentMessage>,
}

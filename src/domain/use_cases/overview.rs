use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use tracing::instrument;

use crate::{
    entities::{
        dashboard::{ChartPoint, DailyCount, DashboardOverview, RecentMessage, Stats},
        project::ProjectStatus,
        resource::ListQuery,
        BlogPost, ContactMessage, Project, Skill,
    },
    errors::{DashboardError, GENERIC_FAILURE},
    http::ApiTransport,
    use_cases::resource::ResourceHandler,
    utils::{html::object_id_timestamp, time_ago::format_time_ago},
};

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
const RECENT_MESSAGES: usize = 5;

/// The data-access handlers the overview reads from.
pub struct OverviewSources<'a, T: ApiTransport> {
    pub blogs: &'a ResourceHandler<BlogPost, T>,
    pub projects: &'a ResourceHandler<Project, T>,
    pub skills: &'a ResourceHandler<Skill, T>,
    pub contacts: &'a ResourceHandler<ContactMessage, T>,
    pub contacts_query: ListQuery,
}

#[instrument(skip(sources))]
pub async fn load_overview<T: ApiTransport>(
    sources: OverviewSources<'_, T>,
    now: DateTime<Utc>,
) -> Result<DashboardOverview, DashboardError> {
    let blogs = sources.blogs.list_all(&ListQuery::default()).await?.into_data(GENERIC_FAILURE)?;
    let projects = sources.projects.list_all(&ListQuery::default()).await?.into_data(GENERIC_FAILURE)?;
    let skills = sources.skills.list_all(&ListQuery::default()).await?.into_data(GENERIC_FAILURE)?;
    let messages = sources.contacts.list_all(&sources.contacts_query).await?.into_data(GENERIC_FAILURE)?;

    Ok(build_overview(&blogs, &projects, &skills, &messages, now))
}

pub fn build_overview(
    blogs: &[BlogPost],
    projects: &[Project],
    skills: &[Skill],
    messages: &[ContactMessage],
    now: DateTime<Utc>,
) -> DashboardOverview {
    DashboardOverview {
        stats: stats(blogs, projects, skills, messages),
        messages_by_date: messages_by_date(messages),
        projects_by_month: projects_by_month(projects),
        skills_by_category: skills_by_category(skills),
        recent_messages: recent_messages(messages, now),
    }
}

fn stats(blogs: &[BlogPost], projects: &[Project], skills: &[Skill], messages: &[ContactMessage]) -> Stats {
    let completed = projects.iter().filter(|p| p.status == ProjectStatus::Completed).count();
    let completion_rate = if projects.is_empty() {
        0
    } else {
        ((completed * 100 + projects.len() / 2) / projects.len()) as u8
    };

    Stats {
        projects: projects.len(),
        blogs: blogs.len(),
        messages: messages.len(),
        skills: skills.len(),
        completion_rate,
    }
}

/// Messages per calendar day, oldest first. Messages without a date are skipped.
pub fn messages_by_date(messages: &[ContactMessage]) -> Vec<DailyCount> {
    let mut days = BTreeMap::new();
    for received in messages.iter().filter_map(ContactMessage::received_at) {
        *days.entry(received.date_naive()).or_insert(0usize) += 1;
    }

    days.into_iter()
        .map(|(day, value)| DailyCount {
            name: day.format("%b %-d").to_string(),
            value,
            full_date: day,
        })
        .collect()
}

/// Projects created in each calendar month, January to December, across all years.
pub fn projects_by_month(projects: &[Project]) -> Vec<ChartPoint> {
    let mut counts = [0usize; 12];
    for created in projects
        .iter()
        .filter_map(|p| p.created_at.or_else(|| object_id_timestamp(&p.id)))
    {
        counts[created.month0() as usize] += 1;
    }

    MONTHS
        .iter()
        .zip(counts)
        .map(|(month, value)| ChartPoint { name: month.to_string(), value })
        .collect()
}

/// Skill counts per category, in order of first appearance.
pub fn skills_by_category(skills: &[Skill]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = Vec::new();
    for skill in skills {
        let name = skill.category.as_str();
        match points.iter_mut().find(|p| p.name == name) {
            Some(point) => point.value += 1,
            None => points.push(ChartPoint { name: name.to_string(), value: 1 }),
        }
    }
    points
}

pub fn recent_messages(messages: &[ContactMessage], now: DateTime<Utc>) -> Vec<RecentMessage> {
    let mut dated: Vec<(DateTime<Utc>, &ContactMessage)> = messages
        .iter()
        .filter_map(|m| m.received_at().map(|at| (at, m)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    dated
        .into_iter()
        .take(RECENT_MESSAGES)
        .map(|(at, m)| RecentMessage {
            id: m.id.clone(),
            name: m.name.clone(),
            email: m.email.clone(),
            message: m.message.clone(),
            date: at.format("%b %-d, %Y").to_string(),
            time: at.format("%-I:%M %p").to_string(),
            time_ago: format_time_ago(at, now),
        })
        .collect()
}

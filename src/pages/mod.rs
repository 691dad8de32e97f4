//! Table definitions for the dashboard pages.
//!
//! Every page keys its rows by record id, filters on its title (or name) column and ends
//! with an actions column. When a [`Downloader`] is supplied, the page's export hook writes
//! `<page>.csv` through it.

use std::sync::Arc;

use crate::errors::AppError;
use crate::export::{download_csv, Downloader};
use crate::models::{
    Announcement, BudgetEntry, EntryType, Event, Member, Notification, Poll, Resource, Suggestion,
};
use crate::table::{Column, Renderable, TableDef, TableOptions};

/// Dashboard pages that show a data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Events,
    Members,
    Budget,
    Polls,
    Suggestions,
    Announcements,
    Notifications,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Events,
        Page::Members,
        Page::Budget,
        Page::Polls,
        Page::Suggestions,
        Page::Announcements,
        Page::Notifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Events => "events",
            Page::Members => "members",
            Page::Budget => "budget",
            Page::Polls => "polls",
            Page::Suggestions => "suggestions",
            Page::Announcements => "announcements",
            Page::Notifications => "notifications",
        }
    }

    /// Name of the file an export of this page is saved as.
    pub fn export_filename(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}

/// Settings shared by every page table.
#[derive(Clone, Default)]
pub struct PageOptions {
    pub page_size: usize,
    pub downloader: Option<Arc<dyn Downloader>>,
}

impl PageOptions {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            downloader: None,
        }
    }

    pub fn with_downloader(mut self, downloader: Arc<dyn Downloader>) -> Self {
        self.downloader = Some(downloader);
        self
    }
}

fn badge(label: impl Into<String>, variant: &str) -> Renderable {
    Renderable::labelled("badge", label).prop("variant", variant)
}

fn row_actions(id: &str, actions: &[&str]) -> Renderable {
    actions.iter().fold(Renderable::element("actions"), |node, action| {
        let mut label = action.to_string();
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        node.child(
            Renderable::labelled("button", label)
                .prop("action", *action)
                .prop("target", id),
        )
    })
}

fn build<T: Resource + 'static>(
    page: Page,
    columns: Vec<Column<T>>,
    filter_column: &str,
    options: &PageOptions,
) -> Result<TableDef<T>, AppError> {
    let table_options = TableOptions::default()
        .page_size(options.page_size.max(1))
        .filter_on(filter_column);
    let def = TableDef::new(columns, table_options)?.with_row_id(|r: &T| r.id().to_string());

    let Some(downloader) = options.downloader.clone() else {
        return Ok(def);
    };
    let filename = page.export_filename();
    Ok(def.on_export(move |table| {
        download_csv(table, downloader.as_ref(), Some(&filename)).map(|_| ())
    }))
}

pub fn events_table(options: &PageOptions) -> Result<TableDef<Event>, AppError> {
    let columns = vec![
        Column::new("title", "Title", |e: &Event| e.title.clone()),
        Column::new("date", "Date", |e: &Event| e.date.clone()),
        Column::new("location", "Location", |e: &Event| e.location.clone()),
        Column::new("attendance", "Attendance", |e: &Event| {
            e.attendance.as_ref().map(|a| a.total())
        }),
        Column::actions(|e: &Event| row_actions(&e.id, &["edit", "delete"])),
    ];
    build(Page::Events, columns, "title", options)
}

pub fn members_table(options: &PageOptions) -> Result<TableDef<Member>, AppError> {
    let columns = vec![
        Column::new("name", "Name", |m: &Member| m.name.clone()),
        Column::new("email", "Email", |m: &Member| m.email.clone()),
        Column::new("phone", "Phone", |m: &Member| m.phone.clone()),
        Column::new("role", "Role", |m: &Member| {
            badge(m.role.as_str(), m.role.as_str())
        }),
        Column::new("status", "Status", |m: &Member| {
            if m.active {
                badge("Active", "success")
            } else {
                badge("Inactive", "muted")
            }
        }),
        Column::actions(|m: &Member| row_actions(&m.id, &["edit", "delete"])),
    ];
    build(Page::Members, columns, "name", options)
}

pub fn budget_table(options: &PageOptions) -> Result<TableDef<BudgetEntry>, AppError> {
    let columns = vec![
        Column::new("title", "Title", |b: &BudgetEntry| b.title.clone()),
        Column::new("type", "Type", |b: &BudgetEntry| match b.entry_type {
            EntryType::Income => badge("income", "success"),
            EntryType::Expense => badge("expense", "destructive"),
        }),
        Column::new("category", "Category", |b: &BudgetEntry| b.category.clone()),
        Column::new("amount", "Amount", |b: &BudgetEntry| b.amount),
        Column::new("date", "Date", |b: &BudgetEntry| b.date.clone()),
        Column::new("notes", "Notes", |b: &BudgetEntry| b.notes.clone()).sortable(false),
        Column::actions(|b: &BudgetEntry| row_actions(&b.id, &["edit", "delete"])),
    ];
    build(Page::Budget, columns, "title", options)
}

pub fn polls_table(options: &PageOptions) -> Result<TableDef<Poll>, AppError> {
    let columns = vec![
        Column::new("title", "Title", |p: &Poll| p.title.clone()),
        Column::new("options", "Options", |p: &Poll| p.options.join(", ")).sortable(false),
        Column::new("votes", "Votes", |p: &Poll| p.total_votes()),
        Column::new("status", "Status", |p: &Poll| {
            if p.active {
                badge("Active", "success")
            } else {
                badge("Closed", "muted")
            }
        }),
        Column::actions(|p: &Poll| row_actions(&p.id, &["vote", "edit", "delete"])),
    ];
    build(Page::Polls, columns, "title", options)
}

pub fn suggestions_table(options: &PageOptions) -> Result<TableDef<Suggestion>, AppError> {
    let columns = vec![
        Column::new("title", "Title", |s: &Suggestion| s.title.clone()),
        Column::new("content", "Content", |s: &Suggestion| s.content.clone()).sortable(false),
        Column::new("author", "Author", |s: &Suggestion| s.author.clone()),
        Column::new("status", "Status", |s: &Suggestion| {
            badge(s.status.as_str(), s.status.as_str())
        }),
        Column::actions(|s: &Suggestion| row_actions(&s.id, &["approve", "reject", "delete"])),
    ];
    build(Page::Suggestions, columns, "title", options)
}

pub fn announcements_table(options: &PageOptions) -> Result<TableDef<Announcement>, AppError> {
    let columns = vec![
        Column::new("title", "Title", |a: &Announcement| a.title.clone()),
        Column::new("author", "Author", |a: &Announcement| a.author.clone()),
        Column::new("pinned", "Pinned", |a: &Announcement| a.pinned),
        Column::new("createdAt", "Posted", |a: &Announcement| a.created_at.clone()),
        Column::actions(|a: &Announcement| row_actions(&a.id, &["pin", "edit", "delete"])),
    ];
    build(Page::Announcements, columns, "title", options)
}

pub fn notifications_table(options: &PageOptions) -> Result<TableDef<Notification>, AppError> {
    let columns = vec![
        Column::new("title", "Title", |n: &Notification| n.title.clone()),
        Column::new("message", "Message", |n: &Notification| n.message.clone()).sortable(false),
        Column::new("kind", "Kind", |n: &Notification| n.kind.clone()),
        Column::new("read", "Read", |n: &Notification| {
            if n.read {
                badge("Read", "muted")
            } else {
                badge("Unread", "default")
            }
        }),
        Column::actions(|n: &Notification| row_actions(&n.id, &["mark-read", "delete"])),
    ];
    build(Page::Notifications, columns, "title", options)
}

//! Notification message templates.
//!
//! Template lines may use `{name}`, `{marker}`, `{date}`, `{slot}` and
//! `{assistant}` placeholders.

use serde::{Deserialize, Serialize};

use crate::models::{AssignmentRecord, RenderedMessage, Role};

/// Fixed message text. The default is the Chinese notification used for
/// midweek meeting parts; a config file may replace any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    /// Role marker for single assignments (brother).
    pub single_marker: String,
    /// Role marker for paired assignments (sister).
    pub paired_marker: String,
    pub greeting: String,
    pub announcement: String,
    pub date_line: String,
    pub slot_line: String,
    pub assistant_line: String,
    pub closing: String,
    pub signature: String,
    /// Joins the two names in a paired display title.
    pub title_separator: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            single_marker: "弟兄".to_string(),
            paired_marker: "姊妹".to_string(),
            greeting: "亲爱的{name}{marker}：".to_string(),
            announcement: "你被安排在传道与生活聚会中负责以下节目：".to_string(),
            date_line: "📅 日期：{date}".to_string(),
            slot_line: "📝 节目：第{slot}项".to_string(),
            assistant_line: "👥 助手：{assistant}".to_string(),
            closing: "请做好准备。谢谢！".to_string(),
            signature: "—— 传道与生活聚会监督".to_string(),
            title_separator: " & ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageRenderer {
    templates: Templates,
}

impl MessageRenderer {
    pub fn new(templates: Templates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    fn marker(&self, role: Role) -> &str {
        match role {
            Role::Single => &self.templates.single_marker,
            Role::Paired => &self.templates.paired_marker,
        }
    }

    fn fill(&self, line: &str, record: &AssignmentRecord) -> String {
        line.replace("{name}", &record.participant)
            .replace("{marker}", self.marker(record.role))
            .replace("{date}", &record.localized_date)
            .replace("{slot}", &record.slot_number.to_string())
            .replace("{assistant}", record.co_participant.as_deref().unwrap_or(""))
    }

    /// Full message text for one record.
    pub fn render(&self, record: &AssignmentRecord) -> String {
        let t = &self.templates;
        let mut lines = vec![
            self.fill(&t.greeting, record),
            String::new(),
            self.fill(&t.announcement, record),
            String::new(),
            self.fill(&t.date_line, record),
            self.fill(&t.slot_line, record),
        ];
        if record.role == Role::Paired {
            lines.push(self.fill(&t.assistant_line, record));
        }
        lines.push(String::new());
        lines.push(self.fill(&t.closing, record));
        lines.push(self.fill(&t.signature, record));
        lines.join("\n")
    }

    /// One-line summary for list views, e.g. `[姊妹] #4 Alice & Bob`.
    pub fn display_title(&self, record: &AssignmentRecord) -> String {
        let names = match (record.role, record.co_participant.as_deref()) {
            (Role::Paired, Some(assistant)) => format!(
                "{}{}{}",
                record.participant, self.templates.title_separator, assistant
            ),
            _ => record.participant.clone(),
        };
        format!("[{}] #{} {}", self.marker(record.role), record.slot_number, names)
    }

    pub fn render_all(&self, records: &[AssignmentRecord]) -> Vec<RenderedMessage> {
        records
            .iter()
            .map(|record| RenderedMessage {
                title: self.display_title(record),
                body: self.render(record),
            })
            .collect()
    }
}

use chrono::NaiveDate;
use tracing::info;

use crate::{
    config::Config,
    error::RunError,
    models::{
        menu::{ResolvedMenu, ScheduleTable},
        message::{MenuMessage, OutgoingEmail},
    },
    services::{
        compose::compose,
        credentials::CredentialProvider,
        email::Mailer,
        menu::MenuService,
        rotation::compute_week_index,
        schedule::load_schedule,
    },
};

/// Today's message together with the facts it was built from.
#[derive(Debug, Clone)]
pub struct PreparedMenu {
    pub today: NaiveDate,
    pub week_index: u8,
    pub resolved: ResolvedMenu,
    pub message: MenuMessage,
}

impl PreparedMenu {
    pub fn found(&self) -> bool {
        matches!(self.resolved, ResolvedMenu::Found(_))
    }
}

pub struct DispatchService;

impl DispatchService {
    /// Rotation week, lookup and formatting for `today`. No I/O.
    pub fn prepare(config: &Config, table: &ScheduleTable, today: NaiveDate) -> PreparedMenu {
        let week_index = compute_week_index(config.cycle_start, today);
        let resolved = MenuService::resolve(table, week_index, today);
        info!(
            "{} is rotation week {} (menu found: {})",
            today,
            week_index,
            matches!(resolved, ResolvedMenu::Found(_))
        );
        let message = compose(today, week_index, &resolved);
        PreparedMenu {
            today,
            week_index,
            resolved,
            message,
        }
    }

    /// Loads the schedule and builds today's message without sending it.
    pub fn preview(config: &Config, today: NaiveDate) -> Result<PreparedMenu, RunError> {
        let table = load_schedule(&config.schedule_path)?;
        Ok(Self::prepare(config, &table, today))
    }

    /// Credentials, schedule, compose, send. Stops at the first failure; the
    /// mailer is never touched unless every earlier step succeeded.
    pub async fn run<C, M>(
        config: &Config,
        today: NaiveDate,
        credentials: &C,
        mailer: &M,
    ) -> Result<PreparedMenu, RunError>
    where
        C: CredentialProvider,
        M: Mailer,
    {
        let secret = credentials
            .fetch()
            .ok_or_else(|| RunError::MissingCredentials(credentials.source()))?;

        let prepared = Self::preview(config, today)?;

        let email = OutgoingEmail::new(
            &config.sender,
            &config.recipients,
            prepared.message.clone(),
        );
        mailer.send(&email, &secret).await?;
        info!("Sent menu for {} to {} recipient(s)", today, email.recipients.len());

        Ok(prepared)
    }
}

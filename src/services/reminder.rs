use crate::models::DueTenant;
use crate::notifier::{templates, Mailer};
use crate::repositories::TenantRepository;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Payment-reminder subsystem: finds tenants whose due day is today and
/// emails each of them at most once per calendar month.
///
/// Invoked inline on the home-page request. The stored per-tenant
/// timestamp is the only idempotency token, so two concurrent requests can
/// race into a double send; the check fails open on purpose.
pub struct ReminderService {
    tenant_repo: Arc<TenantRepository>,
    mailer: Arc<dyn Mailer>,
}

impl ReminderService {
    /// Create a new ReminderService
    pub fn new(tenant_repo: Arc<TenantRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            tenant_repo,
            mailer,
        }
    }

    /// Scan tenants due on `today` and dispatch reminders. Send and stamp
    /// failures are logged and skipped; the scan never aborts. Returns the
    /// number of reminders actually sent.
    pub async fn run_due_checks(&self, today: NaiveDate) -> usize {
        let due = match self.tenant_repo.find_due_on_day(today.day()).await {
            Ok(due) => due,
            Err(e) => {
                warn!("reminder scan failed to query due tenants: {}", e);
                return 0;
            }
        };

        let mut sent = 0;
        for tenant in due {
            if sent_this_month(tenant.last_reminder_at, today) {
                continue;
            }

            if let Err(e) = self.send_reminder(&tenant, today).await {
                warn!(
                    tenant_id = tenant.id,
                    "failed to send payment reminder: {}", e
                );
                continue;
            }

            if let Err(e) = self
                .tenant_repo
                .stamp_reminder_sent(tenant.id, Utc::now().naive_utc())
                .await
            {
                warn!(
                    tenant_id = tenant.id,
                    "reminder sent but timestamp not stored: {}", e
                );
            }

            info!(tenant_id = tenant.id, email = %tenant.email, "payment reminder sent");
            sent += 1;
        }

        sent
    }

    async fn send_reminder(
        &self,
        tenant: &DueTenant,
        today: NaiveDate,
    ) -> crate::error::AppResult<()> {
        let message = templates::payment_reminder_email(
            &tenant.full_name(),
            &tenant.email,
            tenant.monthly_amount,
            &tenant.street,
            today,
        );
        self.mailer.send(&message).await
    }
}

/// Month-equality guard: true when a reminder already went out in the
/// calendar month containing `today`. A missing timestamp means never sent.
pub fn sent_this_month(last_reminder_at: Option<NaiveDateTime>, today: NaiveDate) -> bool {
    match last_reminder_at {
        Some(last) => last.year() == today.year() && last.month() == today.month(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(9, 30, 0).unwrap()
    }

    #[test]
    fn test_never_sent_is_due() {
        assert!(!sent_this_month(None, date(2026, 8, 5)));
    }

    #[test]
    fn test_sent_earlier_same_month_blocks() {
        assert!(sent_this_month(Some(datetime(2026, 8, 1)), date(2026, 8, 5)));
    }

    #[test]
    fn test_sent_last_month_is_due_again() {
        assert!(!sent_this_month(
            Some(datetime(2026, 7, 5)),
            date(2026, 8, 5)
        ));
    }

    #[test]
    fn test_same_month_previous_year_is_due() {
        assert!(!sent_this_month(
            Some(datetime(2025, 8, 5)),
            date(2026, 8, 5)
        ));
    }
}

//! Support-ticket creation.

use palaver_shared::{TicketCategory, UserId};

use crate::error::{ServiceError, ServiceResult};
use crate::services::{CreateTicketRequest, Ticket, TicketService};

/// Caller-supplied ticket fields before validation.
#[derive(Debug, Clone, Default)]
pub struct CreateTicketInput {
    pub category: Option<TicketCategory>,
    pub title: String,
    pub body: String,
    /// Only honoured for abuse reports.
    pub reported_user_id: Option<UserId>,
}

/// Validate and submit a ticket.  The reported user id, when present on
/// an abuse report, is prepended to the body.
pub async fn create_ticket(
    tickets: &dyn TicketService,
    input: CreateTicketInput,
) -> ServiceResult<Ticket> {
    let Some(category) = input.category else {
        return Err(ServiceError::new("Please select a category"));
    };
    if input.body.is_empty() {
        return Err(ServiceError::new("Please enter a body"));
    }

    let reported = input
        .reported_user_id
        .filter(|_| category == TicketCategory::Abuse);
    let body = match reported {
        Some(user_id) => format!("User to report: {user_id}\n\n{}", input.body),
        None => input.body,
    };

    tickets
        .create_ticket(CreateTicketRequest {
            title: input.title,
            body,
            category,
        })
        .await
}

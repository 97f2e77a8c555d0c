use serde::Serialize;

use crate::model::record::StoredRecord;
use crate::model::submission::SubmissionKind;
use crate::service::intake_service::IntakeReceipt;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponseDto {
    pub success: bool,
    pub quote_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponseDto {
    pub success: bool,
    pub message_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponseDto {
    pub success: bool,
    pub lead_id: String,
    pub message: String,
}

/// Success body for any submission kind; serializes as the kind's own shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SubmissionResponseDto {
    Quote(QuoteResponseDto),
    Contact(ContactResponseDto),
    Business(BusinessResponseDto),
}

impl From<IntakeReceipt> for SubmissionResponseDto {
    fn from(receipt: IntakeReceipt) -> Self {
        let id = receipt.id.into_inner();
        let message = receipt.message.to_string();
        match receipt.kind {
            SubmissionKind::Quote => SubmissionResponseDto::Quote(QuoteResponseDto { success: true, quote_id: id, message }),
            SubmissionKind::Contact => SubmissionResponseDto::Contact(ContactResponseDto { success: true, message_id: id, message }),
            SubmissionKind::Business => SubmissionResponseDto::Business(BusinessResponseDto { success: true, lead_id: id, message }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponseDto {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub mode: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointsDto {
    pub quote: &'static str,
    pub contact: &'static str,
    pub business: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiInfoDto {
    pub message: &'static str,
    pub endpoints: EndpointsDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordListDto {
    pub collection: &'static str,
    pub count: usize,
    pub records: Vec<StoredRecord>,
}

//! DNS Message Builder
//!
//! Constructs query and reply messages in wire format using `hickory-proto`.

use super::record_translator::{parse_name, RecordTranslator};
use super::record_type_map::RecordTypeMapper;
use gnocco_domain::name::fqdn;
use gnocco_domain::{DomainError, RecordType, ResourceRecord};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::DNSClass;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a single-question query with a random ID.
    ///
    /// Iterative exchanges leave RD clear; stub lookups set it.
    pub fn query(
        domain: &str,
        record_type: RecordType,
        recursion_desired: bool,
    ) -> Result<Message, DomainError> {
        let mut query = Query::query(parse_name(&fqdn(domain))?, RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(recursion_desired);
        message.add_query(query);
        Ok(message)
    }

    /// Build a query and serialize it, returning the ID for response matching.
    pub fn build_query_with_id(
        domain: &str,
        record_type: RecordType,
        recursion_desired: bool,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let message = Self::query(domain, record_type, recursion_desired)?;
        let bytes = Self::serialize(&message)?;
        Ok((message.id(), bytes))
    }

    /// Reply to `request` carrying `answers`, same ID and question, RA set.
    pub fn reply(request: &Message, answers: &[ResourceRecord]) -> Result<Message, DomainError> {
        let mut reply = Message::response(request.id(), request.op_code());
        reply.add_queries(request.queries().iter().cloned());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(true);
        reply.set_response_code(ResponseCode::NoError);
        for record in answers {
            reply.add_answer(RecordTranslator::to_wire(record)?);
        }
        Ok(reply)
    }

    pub fn servfail(request: &Message) -> Message {
        let mut reply = Message::error_msg(request.id(), request.op_code(), ResponseCode::ServFail);
        reply.add_queries(request.queries().iter().cloned());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(true);
        reply
    }

    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        message.to_vec().map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })
    }
}

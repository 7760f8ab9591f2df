//! Record layouts of the three node-graph call sites.

use hugchat_types::{
    ConversationDetail, ConversationSummary, DecodeError, Message, ModelInfo,
};
use serde_json::{Map, Value};

use super::{has_type, split_concatenated, NodeGraph};

/// `uses.dependencies[0]` suffix of the node holding a conversation's detail.
pub const CONVERSATION_DEPENDENCY_SUFFIX: &str = "/chat/conversation/conversation";

/// Marker in an error node's message that means the session lost access.
const ACCESS_DENIED_MARKER: &str = "access to";

/// Models and conversations from the models page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub models: Vec<ModelInfo>,
    pub conversations: Vec<ConversationSummary>,
}

/// Outcome of decoding a conversation detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPage {
    Conversation(ConversationDetail),
    /// The page held an error node denying access: the session is stale.
    AccessDenied,
}

/// Decode the concatenated models page into models and conversation summaries.
pub fn decode_listing(text: &str) -> Result<Listing, DecodeError> {
    let chunk = split_concatenated(text)?
        .into_iter()
        .find(|c| has_type(c, "data"))
        .ok_or(DecodeError::NoData)?;
    let node = take_nodes(chunk)
        .into_iter()
        .find(|n| has_type(n, "data"))
        .ok_or(DecodeError::NoData)?;

    let graph = NodeGraph::from_node(node, "nodes[data]")?;
    let index = graph.index_map()?;

    let models = graph
        .records(index, "models", "data[0]")?
        .into_iter()
        .map(|(path, record)| decode_model(&graph, record, &path))
        .collect::<Result<Vec<_>, _>>()?;

    let conversations = graph
        .records(index, "conversations", "data[0]")?
        .into_iter()
        .map(|(path, record)| {
            Ok(ConversationSummary {
                id: graph.string(record, "id", &path)?,
                title: graph.nullable_string(record, "title", &path)?.unwrap_or_default(),
                model: graph.string(record, "model", &path)?,
                updated_at: graph.date(record, "updatedAt", &path)?,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(Listing { models, conversations })
}

/// Decode a single-object detail page (`nodes[1]` holds the conversation).
pub fn decode_detail(conversation_id: &str, text: &str) -> Result<DetailPage, DecodeError> {
    let mut page: Value = serde_json::from_str(text)
        .map_err(|e| DecodeError::Malformed { message: e.to_string() })?;
    let node = page
        .get_mut("nodes")
        .and_then(|nodes| nodes.get_mut(1))
        .map(Value::take)
        .ok_or(DecodeError::NoData)?;

    if has_type(&node, "error") {
        let message = node
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if message.contains(ACCESS_DENIED_MARKER) {
            return Ok(DetailPage::AccessDenied);
        }
        return Err(DecodeError::Malformed { message: format!("error node: {message}") });
    }
    if !has_type(&node, "data") {
        return Err(DecodeError::NoData);
    }

    let graph = NodeGraph::from_node(node, "nodes[1]")?;
    decode_conversation(conversation_id, &graph).map(DetailPage::Conversation)
}

/// Decode the concatenated detail page served right after a conversation is created.
pub fn decode_detail_after_create(
    conversation_id: &str,
    text: &str,
) -> Result<ConversationDetail, DecodeError> {
    for chunk in split_concatenated(text)? {
        if !has_type(&chunk, "data") {
            continue;
        }
        for (i, node) in take_nodes(chunk).into_iter().enumerate() {
            let holds_conversation = node
                .pointer("/uses/dependencies/0")
                .and_then(Value::as_str)
                .is_some_and(|dep| dep.ends_with(CONVERSATION_DEPENDENCY_SUFFIX));
            if holds_conversation {
                let graph = NodeGraph::from_node(node, &format!("nodes[{i}]"))?;
                return decode_conversation(conversation_id, &graph);
            }
        }
    }
    Err(DecodeError::NoData)
}

fn take_nodes(mut chunk: Value) -> Vec<Value> {
    match chunk.get_mut("nodes").map(Value::take) {
        Some(Value::Array(nodes)) => nodes,
        _ => Vec::new(),
    }
}

fn decode_model(
    graph: &NodeGraph,
    record: &Map<String, Value>,
    path: &str,
) -> Result<ModelInfo, DecodeError> {
    let id = graph.string(record, "id", path)?;
    let name = graph.string(record, "name", path)?;
    let unlisted = graph.boolean(record, "unlisted", path)?;

    if unlisted {
        return Ok(ModelInfo { id, name, description: None, max_new_tokens: None, active: false });
    }

    let description = graph.nullable_string(record, "description", path)?;
    let parameters_path = format!("{path}.parameters");
    let max_new_tokens = match graph.optional_field(record, "parameters", path)? {
        None | Some(Value::Null) => None,
        Some(Value::Object(parameters)) => match parameters.get("max_new_tokens") {
            Some(index) => {
                graph.number(index, &format!("{parameters_path}.max_new_tokens"))?
            },
            None => None,
        },
        Some(_) => return Err(DecodeError::shape(parameters_path, "object")),
    };

    Ok(ModelInfo { id, name, description, max_new_tokens, active: true })
}

fn decode_conversation(
    conversation_id: &str,
    graph: &NodeGraph,
) -> Result<ConversationDetail, DecodeError> {
    let index = graph.index_map()?;

    let messages = graph
        .records(index, "messages", "data[0]")?
        .into_iter()
        .map(|(path, record)| {
            Ok(Message {
                id: graph.string(record, "id", &path)?,
                from: graph.string(record, "from", &path)?,
                content: graph.nullable_string(record, "content", &path)?.unwrap_or_default(),
                children_ids: graph.string_list(record, "children", &path)?,
                created_at: graph.date(record, "createdAt", &path)?,
                updated_at: graph.date(record, "updatedAt", &path)?,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(ConversationDetail {
        id: conversation_id.to_string(),
        model: graph.string(index, "model", "data[0]")?,
        title: graph.nullable_string(index, "title", "data[0]")?.unwrap_or_default(),
        system_prompt: graph.nullable_string(index, "preprompt", "data[0]")?.unwrap_or_default(),
        messages,
    })
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod schema_tests;

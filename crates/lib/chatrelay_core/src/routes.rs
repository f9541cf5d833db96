//! Gateway route paths shared by the server router and the client.

pub const GET_API_HEALTH: &str = "/api/health";
pub const POST_API_CHAT: &str = "/api/chat";

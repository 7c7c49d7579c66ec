use async_graphql::Object;

/// Mutation struct
pub struct Mutation;

#[Object]
impl Mutation {
    /// Send a message back.
    ///
    /// Example:
    /// ```text
    /// curl -X POST http://localhost:8000/graphql \
    /// -H "Content-Type: application/json" \
    /// -d '{
    ///   "query": "mutation Echo($message: String!) { echo(message: $message) }",
    ///   "variables": {
    ///     "message": "hello"
    ///   }
    /// }'
    /// ```
    async fn echo(&self, message: String) -> String {
        message
    }
}

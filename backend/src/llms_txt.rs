// LLM-friendly documentation endpoint content.

pub const LLMS_TXT: &str = r#"# Quest Master API
> Gamified productivity: turn everyday tasks into quests, earn XP, keep streaks.

## API Base URL
/api/

## Key Endpoints
- POST /api/chat - Ask the AI assistant. Body: {"message": "...", "history": [{"role": "user", "content": "..."}]}
- GET /api/features - List product features (title, description, icon, path, color)

## Chat responses
- 200 {"response": "..."}
- 400 {"error": "Message is required"}
- 500 {"error": "Failed to process request", "details": "...", "timestamp": "..."}

The assistant keeps no memory between calls; send the full history (oldest
first) with every request.

## Pages
- / - Landing page (signed-in visitors are sent to /dashboard)
- /features - Feature overview

## Operations
- GET /health - Liveness check
- GET /metrics - Prometheus metrics
"#;

//! Diagnostic binary for verifying Vertex AI configuration
//! This is a utility binary, not part of the main application

use ai_agent_backend::chat::Message;
use ai_agent_backend::config::Config;
use ai_agent_backend::model::{ChatModel, VertexClient};
use tokio::time::{timeout, Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Checking Vertex AI access from Rust...\n");

    // Step 1: Configuration
    println!("1. Loading configuration from environment...");
    let config = Config::from_env()?;
    if config.model.project_id.is_empty() {
        eprintln!("   ✗ GOOGLE_CLOUD_PROJECT is not set");
        return Err("Project ID not configured".into());
    }
    println!(
        "   ✓ Project: {}, region: {}, model: {}",
        config.model.project_id, config.model.region, config.model.vertex.model
    );

    // Step 2: Credentials
    println!("\n2. Checking for VERTEX_ACCESS_TOKEN...");
    match &config.model.vertex.access_token {
        Some(token) => println!("   ✓ Access token is set (length: {} chars)", token.len()),
        None => {
            eprintln!("   ✗ VERTEX_ACCESS_TOKEN not found in environment");
            eprintln!("   Export one with: export VERTEX_ACCESS_TOKEN=$(gcloud auth print-access-token)");
            return Err("Access token not configured".into());
        }
    }

    // Step 3: Client
    println!("\n3. Initializing client...");
    let client = VertexClient::initialize(
        &config.model.project_id,
        &config.model.region,
        config.model.vertex.clone(),
    )?;
    println!("   ✓ Endpoint: {}", client.endpoint());

    // Step 4: Round trip
    println!("\n4. Sending test message...");
    println!("   Message: 'What is 2+2? Answer in one sentence.'");
    let transcript = vec![Message::user("What is 2+2? Answer in one sentence.")];

    match timeout(Duration::from_secs(30), client.send_chat(&transcript)).await {
        Ok(Ok(reply)) => {
            println!("   ✓ Response received:");
            println!("   {}", reply.content.trim());
        }
        Ok(Err(e)) => {
            eprintln!("   ✗ Request failed: {}", e);
            eprintln!("\n   Troubleshooting:");
            eprintln!("   - Access tokens expire after an hour; fetch a fresh one");
            eprintln!("   - Make sure the Vertex AI API is enabled for the project");
        }
        Err(_) => {
            eprintln!("   ✗ Request timed out after 30 seconds");
        }
    }

    // Step 5: Single prompt with metadata
    println!("\n5. Sending single prompt (no system instruction)...");
    match timeout(
        Duration::from_secs(30),
        client.generate_text("Name one prime number."),
    )
    .await
    {
        Ok(Ok(prediction)) => {
            println!("   ✓ Response: {}", prediction.text.trim());
            for rating in &prediction.safety_ratings {
                println!(
                    "   - {}: {}{}",
                    rating.category,
                    rating.probability.as_deref().unwrap_or("unknown"),
                    if rating.blocked { " (blocked)" } else { "" }
                );
            }
            let citations = prediction
                .citation_metadata
                .map(|m| m.citations)
                .unwrap_or_default();
            println!("   Citations: {}", citations.len());
            for citation in citations {
                println!("   - {}", citation.uri.as_deref().unwrap_or("(no uri)"));
            }
        }
        Ok(Err(e)) => eprintln!("   ✗ Request failed: {}", e),
        Err(_) => eprintln!("   ✗ Request timed out after 30 seconds"),
    }

    println!("\n✓ All checks completed!");
    Ok(())
}

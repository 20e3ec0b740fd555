//! Smoke client exercising every RPC on a running argus-server.
//!
//! Usage: grpc_client [endpoint] [image-url]

use argus_api::pb;
use argus_api::pb::instance_detector_client::InstanceDetectorClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:9090".to_string());
    let url = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "http://localhost:8000/sample.jpg".to_string());

    let mut client = InstanceDetectorClient::connect(endpoint).await?;

    let health = client.health_check(pb::Empty {}).await?.into_inner();
    println!("health: {} (model_loaded={})", health.status, health.model_loaded);

    let info = client.get_model_info(pb::Empty {}).await?.into_inner();
    println!(
        "model: {} v{} on {} ({} categories)",
        info.model_name,
        info.version,
        info.device,
        info.categories.len()
    );

    let response = client
        .predict(pb::PredictRequest { url: url.clone() })
        .await?
        .into_inner();
    println!("predict: {:?}", response.objects);

    let response = client
        .predict_with_confidence(pb::PredictRequest { url: url.clone() })
        .await?
        .into_inner();
    for object in response.objects {
        println!("  {} ({:.3})", object.label, object.confidence);
    }

    let response = client
        .predict_with_options(pb::PredictWithOptionsRequest {
            url: url.clone(),
            confidence_threshold: Some(0.5),
            max_objects: Some(5),
        })
        .await?
        .into_inner();
    println!("predict_with_options: {:?}", response.objects);

    let response = client
        .batch_predict(pb::BatchPredictRequest {
            urls: vec![url, "http://127.0.0.1:1/unreachable.jpg".to_string()],
        })
        .await?
        .into_inner();
    for result in response.results {
        match result.outcome {
            Some(pb::batch_predict_result::Outcome::Objects(list)) => {
                println!("  {} -> {:?}", result.url, list.objects);
            }
            Some(pb::batch_predict_result::Outcome::Error(e)) => {
                println!("  {} -> error: {}", result.url, e);
            }
            None => println!("  {} -> empty outcome", result.url),
        }
    }

    Ok(())
}

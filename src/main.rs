/// Обучение модели Growing Stress и API сервер

use std::sync::Arc;

use anyhow::Context;

use stress_ml::{api, pipeline, AppConfig, RawExample, RawValue, StressPipeline};

/// Пример анкеты для проверочного предсказания после обучения
fn sample_example() -> RawExample {
    [
        ("Gender", "Female"),
        ("Country", "United States"),
        ("Occupation", "Corporate"),
        ("self_employed", "No"),
        ("family_history", "No"),
        ("treatment", "Yes"),
        ("Days_Indoors", "1-14 days"),
        ("Changes_Habits", "No"),
        ("Mental_Health_History", "Yes"),
        ("Mood_Swings", "Medium"),
        ("Coping_Struggles", "No"),
        ("Work_Interest", "No"),
        ("Social_Weakness", "Yes"),
        ("mental_health_interview", "No"),
        ("care_options", "Not sure"),
    ]
    .into_iter()
    .map(|(field, value)| (field.to_string(), RawValue::from(value)))
    .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!(
        "Training {:?} on {}",
        config.model.kind,
        config.data.csv_path
    );

    let pipeline = StressPipeline::from_config(&config).context("Training failed")?;
    pipeline::log_report(pipeline.report());

    match pipeline.predict(&sample_example()) {
        Ok(prediction) => tracing::info!(
            "Sample prediction: Growing Stress = {}",
            if prediction.growing_stress { "Yes" } else { "No" }
        ),
        Err(e) => tracing::warn!("Sample prediction failed: {}", e),
    }

    let app = api::router(Arc::new(pipeline));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

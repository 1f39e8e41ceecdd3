use camits_core::consts::{DEFAULT_YUV_OFFSETS, DEFAULT_YUV_TO_RGB_CCM};
use camits_core::pipeline::config::{
    ChartConfig, CorrelationMetric, GammaConfig, LocatePolicy, ProcessingConfig, YuvConversion,
};

#[test]
fn test_default_config() {
    let config = ProcessingConfig::default();
    assert_eq!(config.yuv.matrix, DEFAULT_YUV_TO_RGB_CCM);
    assert_eq!(config.yuv.offsets, DEFAULT_YUV_OFFSETS);
    assert_eq!(config.gamma.gamma, 2.2);
    assert_eq!(config.gamma.lut_size, 65536);
    assert_eq!(config.chart.height_cm, 16.5);
    assert_eq!(config.chart.distance_cm, 40.0);
    assert_eq!(
        (config.chart.scale_start, config.chart.scale_stop, config.chart.scale_step),
        (0.65, 1.35, 0.05)
    );
    assert_eq!(config.chart.metric, CorrelationMetric::CcoeffNormed);
    assert_eq!(config.chart.policy, LocatePolicy::Strict);
}

#[test]
fn test_config_toml_roundtrip() {
    let config = ProcessingConfig {
        yuv: YuvConversion {
            matrix: [[1.0, 0.0, 1.5748], [1.0, -0.1873, -0.4681], [1.0, 1.8556, 0.0]],
            offsets: [16.0, 128.0, 128.0],
        },
        chart: ChartConfig {
            distance_cm: 31.0,
            metric: CorrelationMetric::Ccoeff,
            policy: LocatePolicy::FullFrameFallback,
            ..Default::default()
        },
        gamma: GammaConfig {
            gamma: 2.4,
            lut_size: 4096,
        },
    };
    let text = toml::to_string(&config).unwrap();
    let parsed: ProcessingConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_config_json_roundtrip() {
    let config = ProcessingConfig::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: ProcessingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let text = r#"
        [chart]
        height_cm = 20.0
        distance_cm = 50.0
        scale_start = 0.5
        scale_stop = 1.5
        scale_step = 0.1
        policy = "FullFrameFallback"
    "#;
    let config: ProcessingConfig = toml::from_str(text).unwrap();
    assert_eq!(config.chart.distance_cm, 50.0);
    assert_eq!(config.chart.policy, LocatePolicy::FullFrameFallback);
    assert_eq!(config.chart.metric, CorrelationMetric::CcoeffNormed);
    assert_eq!(config.yuv, YuvConversion::default());
    assert_eq!(config.gamma, GammaConfig::default());
}

#[test]
fn test_empty_toml_is_default() {
    let config: ProcessingConfig = toml::from_str("").unwrap();
    assert_eq!(config, ProcessingConfig::default());
}

#[test]
fn test_unknown_metric_rejected() {
    let text = r#"
        [chart]
        height_cm = 20.0
        distance_cm = 50.0
        scale_start = 0.5
        scale_stop = 1.5
        scale_step = 0.1
        metric = "Sqdiff"
    "#;
    assert!(toml::from_str::<ProcessingConfig>(text).is_err());
}

#[test]
fn test_display() {
    assert_eq!(CorrelationMetric::Ccoeff.to_string(), "CCOEFF");
    assert_eq!(CorrelationMetric::CcoeffNormed.to_string(), "CCOEFF (normalized)");
    assert_eq!(LocatePolicy::Strict.to_string(), "Strict");
    assert_eq!(LocatePolicy::FullFrameFallback.to_string(), "Full-frame fallback");
}

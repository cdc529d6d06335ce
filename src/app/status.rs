use wardline::vitals::VitalsProbe;
use wardline::warden::Warden;

pub fn render_status<P: VitalsProbe + 'static>(warden: &Warden<P>) -> String {
    let config = warden.config();
    let control = warden.control().snapshot();
    let gate = &config.gate;
    let sensory = &config.sensory;
    let scanner = &config.scanner;

    let lines = [
        "◆ Wardline Status".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Config      {}", config.config_path.display()),
        String::new(),
        "Gate".to_string(),
        format!(
            "  Auth key         {}",
            if gate.auth_key.is_empty() {
                "(unset, all requests denied)"
            } else {
                "configured"
            }
        ),
        format!("  Veto             {}", on_off(control.veto_enabled)),
        format!("  Forbidden        {}", gate.forbidden_intents.join(", ")),
        format!("  CPU ceiling      {:.0}%", gate.cpu_ceiling * 100.0),
        format!(
            "  Thermal          {:.1}°C / +{:.1}°C",
            gate.temp_ceiling_c, gate.temp_delta_ceiling_c
        ),
        format!("  Complexity       {} units", gate.complexity_ceiling),
        String::new(),
        "Sensory".to_string(),
        format!("  Ingestion        {}", on_off(control.ingestion_enabled)),
        format!("  Channels         {}", sensory.channels.join(", ")),
        format!(
            "  Capacity         {} per channel, {} total",
            sensory.channel_capacity, sensory.total_capacity
        ),
        format!(
            "  Pattern cache    {} → {}",
            sensory.cache_soft_ceiling, sensory.cache_trim_target
        ),
        String::new(),
        "Scanner".to_string(),
        format!("  Approval score   {}", scanner.approval_score),
        format!(
            "  Classes          Red < {} ≤ Yellow < {} ≤ Green",
            scanner.red_below, scanner.yellow_below
        ),
        format!("  Stability limit  {} lines", scanner.stability_line_limit),
    ];
    lines.join("\n")
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

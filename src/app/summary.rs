/// Outcome of one endpoint measurement. `Err` holds the printed error.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EndpointOutcome {
    pub(crate) exchange: String,
    pub(crate) endpoint: String,
    pub(crate) result: Result<f64, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RunSummary {
    outcomes: Vec<EndpointOutcome>,
}

impl RunSummary {
    pub(crate) fn push(&mut self, outcome: EndpointOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn outcomes(&self) -> &[EndpointOutcome] {
        &self.outcomes
    }

    pub(crate) fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub(crate) fn print(&self) {
        println!();
        println!("=== Test Summary ===");

        let mut current: Option<&str> = None;
        for outcome in self.outcomes() {
            if current != Some(outcome.exchange.as_str()) {
                println!();
                println!("{} Results:", outcome.exchange);
                current = Some(outcome.exchange.as_str());
            }
            match &outcome.result {
                Ok(latency_ms) => println!("  ✓ {}: {:.2} ms", outcome.endpoint, latency_ms),
                Err(message) => println!("  ✗ {}: Failed - {}", outcome.endpoint, message),
            }
        }

        println!();
        println!(
            "API latency tests completed: {} of {} endpoints measured.",
            self.succeeded(),
            self.outcomes().len()
        );
    }
}

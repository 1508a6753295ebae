// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pure input builders for the planning stage.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::form::WithdrawalFormState;
use super::stage::PipelineError;
use crate::models::{
    Address, Amount, Denom, Height, IdentifiedClientState, Ics20Withdrawal, Metadata,
    TransactionPlannerRequest,
};

/// How long a withdrawal may sit unrelayed before it times out.
pub const WITHDRAWAL_TIMEOUT: Duration = Duration::from_secs(2 * 24 * 60 * 60);

/// Blocks past the counterparty's latest known height before timeout.
pub const TIMEOUT_HEIGHT_MARGIN: u64 = 1000;

/// Convert a user-entered decimal amount into base units.
///
/// # Arguments
/// * `amount` - Amount as typed (e.g., "1.5")
/// * `exponent` - Exponent of the display unit relative to the base
///
/// Rejects empty, negative, zero and non-numeric input, more fractional digits
/// than `exponent` allows, and amounts that do not fit in 128 bits.
pub fn parse_base_units(amount: &str, exponent: u8) -> Result<Amount, PipelineError> {
    let invalid = |reason: &str| PipelineError::InvalidAmount(reason.to_string());
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(invalid("amount is required"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("amount must not be negative"));
    }

    let (whole_part, fraction_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole_part.is_empty() && fraction_part.is_empty())
        || !is_digits(whole_part)
        || !is_digits(fraction_part)
    {
        return Err(invalid("amount is not a number"));
    }

    let fraction_part = fraction_part.trim_end_matches('0');
    if fraction_part.len() > exponent as usize {
        return Err(PipelineError::InvalidAmount(format!(
            "too many decimal places (max {exponent})"
        )));
    }

    let too_large = || invalid("amount is too large");
    let whole = if whole_part.is_empty() {
        0
    } else {
        whole_part.parse::<u128>().map_err(|_| too_large())?
    };
    let fraction = if fraction_part.is_empty() {
        0
    } else {
        // Pad with zeros to match the exponent
        format!("{:0<width$}", fraction_part, width = exponent as usize)
            .parse::<u128>()
            .map_err(|_| too_large())?
    };

    let total = 10u128
        .checked_pow(u32::from(exponent))
        .and_then(|multiplier| whole.checked_mul(multiplier))
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(too_large)?;

    if total == 0 {
        return Err(invalid("amount must be greater than zero"));
    }
    Ok(Amount(total))
}

/// Exponent of the asset's display unit; `0` if the display unit is not listed.
pub fn display_exponent(asset: &Metadata) -> u8 {
    asset
        .denom_units
        .iter()
        .find(|unit| unit.denom == asset.display)
        .map_or(0, |unit| unit.exponent)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    pub height: Height,
    /// Unix time in milliseconds.
    pub time_ms: u64,
}

/// Timeout for a withdrawal to `chain_id`.
///
/// The height is the counterparty's latest height plus
/// [`TIMEOUT_HEIGHT_MARGIN`] within the same revision; the time is
/// [`WITHDRAWAL_TIMEOUT`] after `now`.
pub fn compute_timeout(
    now: DateTime<Utc>,
    chain_id: &str,
    client_states: &[IdentifiedClientState],
) -> Result<Timeout, PipelineError> {
    let state = client_states
        .iter()
        .filter_map(|identified| identified.client_state.as_ref())
        .find(|state| state.chain_id == chain_id)
        .ok_or_else(|| PipelineError::UnknownChain(chain_id.to_string()))?;
    let latest = state
        .latest_height
        .ok_or_else(|| PipelineError::MissingLatestHeight(chain_id.to_string()))?;

    let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let timeout_ms = u64::try_from(WITHDRAWAL_TIMEOUT.as_millis()).unwrap_or(u64::MAX);

    Ok(Timeout {
        height: Height {
            revision_number: latest.revision_number,
            revision_height: latest.revision_height.saturating_add(TIMEOUT_HEIGHT_MARGIN),
        },
        time_ms: now_ms.saturating_add(timeout_ms),
    })
}

/// Form input that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalIntent {
    pub amount: Amount,
    /// Base denomination of the asset
    pub denom: String,
    pub destination_address: String,
    pub chain_id: String,
    pub source_channel: String,
}

/// Check a form snapshot without touching the network.
pub fn validate_withdrawal(form: &WithdrawalFormState) -> Result<WithdrawalIntent, PipelineError> {
    let destination = form
        .destination_address
        .as_deref()
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .ok_or(PipelineError::MissingDestinationAddress)?;
    let chain = form.chain.as_ref().ok_or(PipelineError::MissingChain)?;
    let source_channel = chain
        .ibc_channel
        .clone()
        .ok_or(PipelineError::MissingChannel)?;

    if destination.chars().any(char::is_whitespace) {
        return Err(PipelineError::InvalidDestinationAddress(destination.to_string()));
    }
    if let Some(prefix) = &chain.address_prefix {
        let well_formed = destination
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_prefix('1'))
            .is_some_and(|data| !data.is_empty());
        if !well_formed {
            return Err(PipelineError::InvalidDestinationAddress(format!(
                "{destination} is not a {} address",
                chain.display_name
            )));
        }
    }

    let amount = parse_base_units(&form.amount, display_exponent(&form.asset))?;

    Ok(WithdrawalIntent {
        amount,
        denom: form.asset.base.clone(),
        destination_address: destination.to_string(),
        chain_id: chain.chain_id.clone(),
        source_channel,
    })
}

/// Planner request holding a single ICS-20 withdrawal.
pub fn build_plan_request(
    intent: &WithdrawalIntent,
    return_address: Address,
    timeout: Timeout,
) -> TransactionPlannerRequest {
    TransactionPlannerRequest {
        ics20_withdrawals: vec![Ics20Withdrawal {
            amount: intent.amount,
            denom: Denom {
                denom: intent.denom.clone(),
            },
            destination_chain_address: intent.destination_address.clone(),
            return_address,
            timeout_height: timeout.height,
            timeout_time: timeout.time_ms,
            source_channel: intent.source_channel.clone(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::models::{ClientState, DenomUnit};
    use chrono::TimeZone;

    fn asset(display: &str, units: &[(&str, u8)]) -> Metadata {
        Metadata {
            base: "ubase".into(),
            display: display.into(),
            symbol: "B".into(),
            denom_units: units
                .iter()
                .map(|(denom, exponent)| DenomUnit {
                    denom: denom.to_string(),
                    exponent: *exponent,
                })
                .collect(),
            penumbra_asset_id: catalog::asset_id_for_denom("ubase"),
        }
    }

    fn client_state(chain_id: &str, height: Option<(u64, u64)>) -> IdentifiedClientState {
        IdentifiedClientState {
            client_id: format!("07-tendermint-{chain_id}"),
            client_state: Some(ClientState {
                chain_id: chain_id.into(),
                latest_height: height.map(|(revision_number, revision_height)| Height {
                    revision_number,
                    revision_height,
                }),
            }),
        }
    }

    fn form() -> WithdrawalFormState {
        let mut form = WithdrawalFormState::new(catalog::PENUMBRA.metadata());
        form.amount = "2.5".into();
        form.chain = Some(catalog::OSMOSIS_TESTNET.chain());
        form.destination_address = Some("osmo1qqqsyqcyq5rqwzqfpg9scrgwpugpzysn".into());
        form
    }

    #[test]
    fn converts_display_amounts_to_base_units() {
        assert_eq!(parse_base_units("1.5", 6).unwrap(), Amount(1_500_000));
        assert_eq!(parse_base_units("1", 6).unwrap(), Amount(1_000_000));
        assert_eq!(parse_base_units(" 0.000001 ", 6).unwrap(), Amount(1));
        assert_eq!(parse_base_units(".5", 1).unwrap(), Amount(5));
        assert_eq!(parse_base_units("1.50", 1).unwrap(), Amount(15));
        assert_eq!(parse_base_units("42", 0).unwrap(), Amount(42));
        assert_eq!(parse_base_units("1", 18).unwrap(), Amount(10u128.pow(18)));
    }

    #[test]
    fn rejects_bad_amounts() {
        for bad in ["", "  ", "-1", "abc", "1.2.3", "1e6", ".", "0", "0.000"] {
            assert!(
                matches!(parse_base_units(bad, 6), Err(PipelineError::InvalidAmount(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(parse_base_units("1.0000001", 6).is_err());
        assert!(parse_base_units("1.5", 0).is_err());
        assert!(parse_base_units(&u128::MAX.to_string(), 1).is_err());
        assert!(parse_base_units("1", 39).is_err());
    }

    #[test]
    fn exponent_comes_from_display_unit() {
        assert_eq!(display_exponent(&asset("big", &[("ubase", 0), ("big", 6)])), 6);
        assert_eq!(display_exponent(&asset("missing", &[("ubase", 0), ("big", 6)])), 0);
        assert_eq!(display_exponent(&catalog::TEST_USD.metadata()), 18);
    }

    #[test]
    fn timeout_extends_latest_height_and_now() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let states = [
            client_state("grand-1", Some((1, 50))),
            client_state("osmo-test-5", Some((5, 1_000_000))),
        ];

        let timeout = compute_timeout(now, "osmo-test-5", &states).unwrap();
        assert_eq!(
            timeout.height,
            Height {
                revision_number: 5,
                revision_height: 1_001_000
            }
        );
        assert_eq!(
            timeout.time_ms,
            now.timestamp_millis() as u64 + 2 * 24 * 60 * 60 * 1000
        );
    }

    #[test]
    fn timeout_requires_known_chain_with_height() {
        let now = Utc::now();
        let states = [
            client_state("grand-1", None),
            IdentifiedClientState {
                client_id: "07-tendermint-9".into(),
                client_state: None,
            },
        ];
        assert!(matches!(
            compute_timeout(now, "osmo-test-5", &states),
            Err(PipelineError::UnknownChain(id)) if id == "osmo-test-5"
        ));
        assert!(matches!(
            compute_timeout(now, "grand-1", &states),
            Err(PipelineError::MissingLatestHeight(_))
        ));
    }

    #[test]
    fn validation_checks_fields_in_order() {
        let mut missing_address = form();
        missing_address.destination_address = Some("  ".into());
        missing_address.chain = None;
        assert!(matches!(
            validate_withdrawal(&missing_address),
            Err(PipelineError::MissingDestinationAddress)
        ));

        let mut no_chain = form();
        no_chain.chain = None;
        assert!(matches!(validate_withdrawal(&no_chain), Err(PipelineError::MissingChain)));

        let mut no_channel = form();
        no_channel.chain = Some(catalog::COSMOS_HUB_TESTNET.chain());
        no_channel.destination_address = Some("cosmos1abc".into());
        assert!(matches!(validate_withdrawal(&no_channel), Err(PipelineError::MissingChannel)));

        let mut wrong_prefix = form();
        wrong_prefix.destination_address = Some("noble1abc".into());
        assert!(matches!(
            validate_withdrawal(&wrong_prefix),
            Err(PipelineError::InvalidDestinationAddress(_))
        ));

        let mut bad_amount = form();
        bad_amount.amount = "lots".into();
        assert!(matches!(validate_withdrawal(&bad_amount), Err(PipelineError::InvalidAmount(_))));
    }

    #[test]
    fn plan_request_carries_one_withdrawal() {
        let intent = validate_withdrawal(&form()).unwrap();
        assert_eq!(intent.amount, Amount(2_500_000));
        assert_eq!(intent.denom, "upenumbra");
        assert_eq!(intent.source_channel, "channel-0");

        let timeout = Timeout {
            height: Height {
                revision_number: 5,
                revision_height: 2000,
            },
            time_ms: 1_700_000_000_000,
        };
        let return_address = Address { inner: vec![9; 80] };
        let request = build_plan_request(&intent, return_address.clone(), timeout);

        assert_eq!(request.ics20_withdrawals.len(), 1);
        let withdrawal = &request.ics20_withdrawals[0];
        assert_eq!(withdrawal.amount, Amount(2_500_000));
        assert_eq!(withdrawal.denom.denom, "upenumbra");
        assert_eq!(withdrawal.destination_chain_address, intent.destination_address);
        assert_eq!(withdrawal.return_address, return_address);
        assert_eq!(withdrawal.timeout_height, timeout.height);
        assert_eq!(withdrawal.timeout_time, 1_700_000_000_000);
        assert_eq!(withdrawal.source_channel, "channel-0");
    }
}

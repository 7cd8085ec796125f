//! Turns one match document into one flat record per delivery.
//!
//! Records come out in innings → over → delivery order. Innings are numbered
//! from 1 in document order; the over number is taken from the over itself.
//! Missing numeric breakdowns become 0 and missing identifiers stay `None`;
//! both defaults are applied in [`FlatDeliveryRecord::from_delivery`].

use serde::Serialize;

use crate::document::{Delivery, MatchDocument, MatchInfo, Scalar, Wicket};

/// Output column names, in order.
pub const COLUMNS: [&str; 24] = [
    "match_id",
    "season",
    "date_list",
    "venue",
    "city",
    "teams",
    "innings",
    "batting_team",
    "over",
    "ball_label",
    "batter",
    "bowler",
    "non_striker",
    "runs_batter",
    "runs_extras",
    "runs_total",
    "extra_byes",
    "extra_legbyes",
    "extra_wides",
    "extra_noballs",
    "extra_penalty",
    "wicket_kind",
    "wicket_player_out",
    "wicket_fielders",
];

/// Match-level fields shared by every record of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchContext {
    pub match_id: Option<Scalar>,
    pub season: Option<Scalar>,
    pub date_list: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub teams: String,
}

impl MatchContext {
    pub fn from_info(info: &MatchInfo) -> Self {
        Self {
            match_id: info.match_id().cloned(),
            season: info.season.clone(),
            date_list: info
                .dates
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(","),
            venue: info.venue.clone(),
            city: info.city.clone(),
            teams: info.teams.join(","),
        }
    }
}

/// Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatDeliveryRecord {
    pub match_id: Option<Scalar>,
    pub season: Option<Scalar>,
    pub date_list: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub teams: String,

    pub innings: u32,
    pub batting_team: Option<String>,
    pub over: Option<u32>,
    pub ball_label: Option<Scalar>,
    pub batter: Option<String>,
    pub bowler: Option<String>,
    pub non_striker: Option<String>,

    pub runs_batter: u32,
    pub runs_extras: u32,
    pub runs_total: u32,

    pub extra_byes: u32,
    pub extra_legbyes: u32,
    pub extra_wides: u32,
    pub extra_noballs: u32,
    pub extra_penalty: u32,

    pub wicket_kind: Option<String>,
    pub wicket_player_out: Option<String>,
    pub wicket_fielders: Option<String>,
}

impl FlatDeliveryRecord {
    pub fn from_delivery(
        ctx: &MatchContext,
        innings: u32,
        batting_team: Option<&str>,
        over: Option<u32>,
        delivery: &Delivery,
    ) -> Self {
        let runs = delivery.runs.clone().unwrap_or_default();
        let extras = delivery.extras.clone().unwrap_or_default();
        let first_wicket = delivery.wickets.first();

        Self {
            match_id: ctx.match_id.clone(),
            season: ctx.season.clone(),
            date_list: ctx.date_list.clone(),
            venue: ctx.venue.clone(),
            city: ctx.city.clone(),
            teams: ctx.teams.clone(),

            innings,
            batting_team: batting_team.map(str::to_string),
            over,
            ball_label: delivery.ball.clone(),
            batter: delivery.batter.clone(),
            bowler: delivery.bowler.clone(),
            non_striker: delivery.non_striker.clone(),

            runs_batter: runs.batter.unwrap_or(0),
            runs_extras: runs.extras.unwrap_or(0),
            runs_total: runs.total.unwrap_or(0),

            extra_byes: extras.byes.unwrap_or(0),
            extra_legbyes: extras.legbyes.unwrap_or(0),
            extra_wides: extras.wides.unwrap_or(0),
            extra_noballs: extras.noballs.unwrap_or(0),
            extra_penalty: extras.penalty.unwrap_or(0),

            wicket_kind: first_wicket.and_then(|w| w.kind.clone()),
            wicket_player_out: first_wicket.and_then(|w| w.player_out.clone()),
            wicket_fielders: fielder_names(&delivery.wickets),
        }
    }
}

/// First fielder of every wicket entry that has one, comma-joined.
/// `None` only when the delivery has no wickets at all.
fn fielder_names(wickets: &[Wicket]) -> Option<String> {
    if wickets.is_empty() {
        return None;
    }
    let names: Vec<&str> = wickets
        .iter()
        .filter_map(|w| w.fielders.first())
        .map(|f| f.name.as_deref().unwrap_or(""))
        .collect();
    Some(names.join(","))
}

pub fn flatten(document: &MatchDocument) -> Vec<FlatDeliveryRecord> {
    let ctx = MatchContext::from_info(&document.info);
    let mut records = Vec::with_capacity(document.delivery_count());

    for (innings_no, innings) in (1u32..).zip(&document.innings) {
        for over in &innings.overs {
            for delivery in &over.deliveries {
                records.push(FlatDeliveryRecord::from_delivery(
                    &ctx,
                    innings_no,
                    innings.team.as_deref(),
                    over.over,
                    delivery,
                ));
            }
        }
    }
    records
}

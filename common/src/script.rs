//! 売り手/買い手エージェントの会話台本
//!
//! 実際の推論は行わない。8行の固定台本を順番に表示するだけ。

use crate::types::{ScriptLine, Speaker};

pub const SCRIPT_LEN: usize = 8;

pub const NEGOTIATION_SCRIPT: [ScriptLine; SCRIPT_LEN] = [
    ScriptLine {
        speaker: Speaker::Seller,
        text: "Hello! I've analyzed this product - it's a cotton t-shirt with excellent potential. Made from 100% organic cotton, sustainably sourced. Let me pitch this to you!",
    },
    ScriptLine {
        speaker: Speaker::Buyer,
        text: "Interesting! Tell me more about the material sourcing and production costs.",
    },
    ScriptLine {
        speaker: Speaker::Seller,
        text: "Great question! I've identified 3 certified suppliers: EcoTextile Co. ($4.20/unit), GreenThread ($4.50/unit with GOTS certification), and SustainWeave ($4.80/unit, carbon-neutral). All use organic cotton from verified sustainable farms.",
    },
    ScriptLine {
        speaker: Speaker::Buyer,
        text: "The pricing is competitive. What about the environmental impact and quality certifications?",
    },
    ScriptLine {
        speaker: Speaker::Seller,
        text: "All suppliers have OEKO-TEX Standard 100 certification. The fabric is 180 GSM weight, breathable, and biodegradable. Carbon footprint is 2.3kg CO2 per unit - 40% lower than conventional cotton. Perfect for eco-conscious brands!",
    },
    ScriptLine {
        speaker: Speaker::Buyer,
        text: "Excellent pitch! The sustainability metrics are impressive. I'm particularly interested in the GreenThread option with GOTS certification. Let's proceed with a sample order to verify quality.",
    },
    ScriptLine {
        speaker: Speaker::Seller,
        text: "Perfect! I'll connect you with GreenThread. They can provide samples within 5-7 business days. MOQ is 100 units, with bulk discounts at 500+ units. Shall I initiate the connection?",
    },
    ScriptLine {
        speaker: Speaker::Buyer,
        text: "Yes, please proceed! This looks like a great sustainable product opportunity. Looking forward to the partnership.",
    },
];

/// 会話中のフッター表示
pub const STATUS_NEGOTIATING: &str = "Agents are negotiating...";
/// 全行表示後のフッター表示
pub const STATUS_DEAL: &str = "🎉 Connection established! Deal in progress...";
/// 解析中の表示
pub const STATUS_ANALYZING: &str = "Analyzing product...";

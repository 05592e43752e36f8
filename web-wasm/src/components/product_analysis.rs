//! 解析結果パネル（固定データの表示のみ）

use back2wo_common::catalog::{COST_SAVINGS_NOTE, FINDINGS, SUPPLIERS};
use back2wo_common::{Finding, FindingKind, SupplierRecord};
use leptos::prelude::*;

#[component]
pub fn ProductAnalysis() -> impl IntoView {
    view! {
        <div class="product-analysis">
            <h3>"Product Analysis"</h3>
            <div class="findings">
                {FINDINGS.iter().map(|finding| view! { <FindingRow finding=*finding /> }).collect_view()}
            </div>

            <h4>"Sustainable Suppliers"</h4>
            <div class="suppliers">
                {SUPPLIERS.iter().map(|supplier| view! { <SupplierCard supplier=*supplier /> }).collect_view()}
            </div>

            <div class="savings">
                <span>"💲 "{COST_SAVINGS_NOTE}</span>
            </div>
        </div>
    }
}

#[component]
fn FindingRow(finding: Finding) -> impl IntoView {
    let (class, icon) = match finding.kind {
        FindingKind::Material => ("finding material", "🍃"),
        FindingKind::Category => ("finding category", "📦"),
        FindingKind::Carbon => ("finding carbon", "📉"),
        FindingKind::Quality => ("finding quality", "🏅"),
    };

    view! {
        <div class=class>
            <span class="finding-icon">{icon}</span>
            <div>
                <p>{finding.title}</p>
                <p class="text-muted">{finding.detail}</p>
            </div>
        </div>
    }
}

#[component]
fn SupplierCard(supplier: SupplierRecord) -> impl IntoView {
    view! {
        <div class="supplier-card">
            <div class="supplier-head">
                <div>
                    <p class="supplier-name">
                        {supplier.name}
                        <span class="badge">{supplier.certification}</span>
                    </p>
                    <p class="text-muted">{supplier.location}</p>
                </div>
                <div class="supplier-price">
                    <p>{supplier.price_label()}</p>
                    <p class="text-muted">"per unit"</p>
                </div>
            </div>
            <div class="supplier-meta">
                <span>"★ "{supplier.rating.to_string()}</span>
                <span>"🍃 "{supplier.sustainability_label()}</span>
            </div>
        </div>
    }
}

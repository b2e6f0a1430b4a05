//! Standard financial field vocabulary and the extraction prompts built from it.

use super::extraction::ResultType;
use super::quarter::FiscalQuarter;

/// Standard field names, in reporting order, with the source labels they cover.
pub const STANDARD_FIELDS: &[(&str, &str)] = &[
    (
        "CoreRevenue",
        "\"Revenue from operations\", \"Revenue from Goods Sold\", \"Income from operations\" (excluding other operating income)",
    ),
    ("OtherOperatingRevenue", "\"Other operating income\""),
    ("OtherIncome", "\"Other income\", \"Non-operating income\""),
    ("TotalRevenue", "\"Total income\", \"Total revenue\""),
    (
        "CostOfMaterialsConsumed",
        "\"Cost of materials consumed\", \"Raw material consumed\"",
    ),
    (
        "PurchasesOfTradeGoods",
        "\"Purchase of stock-in-trade\", \"Purchase of traded goods\"",
    ),
    (
        "ChangesInInventories",
        "\"Changes in inventories of finished goods, stock-in-trade and work-in-progress\", \"Change in finished goods\"",
    ),
    (
        "EmployeeBenefitsExpense",
        "\"Employee benefit expense\", \"Salaries and wages\", \"Staff costs\"",
    ),
    (
        "FinanceCost",
        "\"Finance costs\", \"Interest expense\", \"Borrowing cost\"",
    ),
    (
        "DepreciationAndAmortisation",
        "\"Depreciation and amortisation expense\", \"Depreciation\"",
    ),
    ("OtherExpenses", "\"Other expenses\""),
    ("TotalExpenses", "\"Total expenses\""),
    (
        "ProfitBeforeShareOfAssociatesAndExceptionalItemsAndTax",
        "\"Profit before share of associate companies, exceptional items and tax\"",
    ),
    (
        "ShareOfProfitOrLossOfAssociates",
        "\"Share of profit/(loss) of associate companies\"",
    ),
    (
        "ProfitBeforeExceptionalItemsAndTax",
        "\"Profit before exceptional items and tax\"",
    ),
    (
        "ExceptionalItems",
        "\"Exceptional items\", \"Extraordinary items\" (signed like a profit item: positive raises profit)",
    ),
    ("ProfitBeforeTax", "\"Profit before tax\", \"PBT\""),
    ("CurrentTax", "\"Current tax\""),
    ("DeferredTax", "\"Deferred tax\""),
    (
        "PriorPeriodTax",
        "\"Tax adjustment for earlier periods\", \"Tax for earlier years\"",
    ),
    (
        "TotalTaxExpense",
        "\"Total tax expense\", \"Provision for tax\"",
    ),
    (
        "NetProfit",
        "\"Net profit\", \"Profit after tax\", \"PAT\", \"Profit/(loss) for the period\"",
    ),
    (
        "ProfitAttributableToOwners",
        "\"Profit attributable to: Owners of the Company\"",
    ),
    (
        "ProfitAttributableToNonControllingInterests",
        "\"Profit attributable to: Non-controlling interests\"",
    ),
    ("EPSBasic", "\"Earnings per share - Basic\", \"EPS (Basic)\""),
    (
        "EPSDiluted",
        "\"Earnings per share - Diluted\", \"EPS (Diluted)\"",
    ),
];

/// Returns `true` if `field_name` belongs to the standard vocabulary.
pub fn is_standard_field(field_name: &str) -> bool {
    STANDARD_FIELDS.iter().any(|(name, _)| *name == field_name)
}

/// System instruction sent with every extraction request.
pub fn system_instruction() -> String {
    let mut instruction = String::from(
        "You convert quarterly financial results PDFs filed with BSE into a standard \
         key/value format. Each request names the quarter and the statement type \
         (consolidated or standalone); extract figures for that quarter and statement \
         type only.\n\n\
         Standard fields and the source labels they cover:\n",
    );
    for (name, labels) in STANDARD_FIELDS {
        instruction.push_str(&format!("- {}: {}\n", name, labels));
    }
    instruction.push_str(
        "\nOutput rules:\n\
         - Reply with a single JSON object and nothing else.\n\
         - Include every standard field above, in the listed order. Use an empty string \
           when a value is not reported.\n\
         - After the standard fields, include every other line item of the statement \
           under its original label, in document order.\n\
         - A line item that matches no standard field, or more than one, keeps its \
           original label. Never map two line items to the same standard field.\n\
         - Values are in crores of rupees with all decimals preserved.\n\
         - If the document contains only one set of results, return that set whichever \
           statement type was requested.\n",
    );
    instruction
}

/// Per-request prompt naming the quarter and statement type, e.g. `Q2 FY2025, Consolidated`.
pub fn extraction_prompt(quarter: FiscalQuarter, result_type: ResultType) -> String {
    format!(
        "Extract the financial results in the attached PDF for Q{} FY{}, {}. \
         Reply strictly in JSON as instructed.",
        quarter.quarter_number(),
        quarter.fiscal_year(),
        result_type
    )
}

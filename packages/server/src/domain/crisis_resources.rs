//! 危機対応メッセージの整形
//!
//! 深刻度に応じて 3 種類の文面を返します。どの文面にもホットライン一覧と
//! 緊急通報の案内が必ず含まれます。

use super::RiskLevel;

const EMERGENCY_NOTICE: &str = "🆘 **Crisis Resources** 🆘\n\n\
**If you are in immediate danger, please call emergency services (911/112/999).**\n\n";

const HOTLINES: &str = "**24/7 Crisis Hotlines:**\n\
• US: Call/Text **988** (Suicide & Crisis Lifeline)\n\
• US: Text **HOME** to **741741** (Crisis Text Line)\n\
• International: **findahelpline.com**\n\n\
**You are not alone. Help is available.**";

/// Build the private resource message for `level`.
///
/// `None` and `Low` both get the supportive variant.
pub fn resources_for(level: RiskLevel) -> String {
    match level {
        RiskLevel::Critical | RiskLevel::High => format!(
            "{EMERGENCY_NOTICE}⚠️ **This message may indicate a mental health crisis.** ⚠️\n\n\
Please reach out to a crisis professional immediately:\n\n{HOTLINES}"
        ),
        RiskLevel::Medium => format!(
            "{EMERGENCY_NOTICE}If you're struggling, consider reaching out:\n\n{HOTLINES}"
        ),
        RiskLevel::Low | RiskLevel::None => format!(
            "💙 **Support Resources** 💙\n\n\
If you need support, here are some resources:\n\n\
**If you are in immediate danger, please call emergency services (911/112/999).**\n\n{HOTLINES}"
        ),
    }
}

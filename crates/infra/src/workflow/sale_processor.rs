use marketerp_core::DomainResult;
use marketerp_inventory::StockKey;
use marketerp_sales::{FinalizeSale, Sale, SaleId};

use crate::store::UnitOfWork;

/// Prove and take stock for every line, then persist the sale.
///
/// The only place stock leaves the ledger. Lines for the same product decrement
/// cumulatively because each line re-reads the entry the previous one saved.
pub fn process_sale(
    uow: &mut dyn UnitOfWork,
    sale_id: SaleId,
    cmd: &FinalizeSale,
) -> DomainResult<Sale> {
    let sale = Sale::record(sale_id, cmd)?;

    for line in sale.lines() {
        let key = StockKey::new(line.product_id, sale.warehouse_id());
        let mut entry = uow.stock().require(&key)?;
        entry.decrement(line.quantity)?;
        uow.stock_mut().save(entry)?;
    }

    uow.sales_mut().insert(sale)
}

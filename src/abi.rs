//! Solidity ABI bindings for Seaport and the token standards it moves.

pub mod seaport {
    use ethers::contract::abigen;

    abigen!(
        SeaportContract,
        r#"[
            struct OfferItem { uint8 itemType; address token; uint256 identifierOrCriteria; uint256 startAmount; uint256 endAmount; }
            struct ConsiderationItem { uint8 itemType; address token; uint256 identifierOrCriteria; uint256 startAmount; uint256 endAmount; address recipient; }
            struct OrderParameters { address offerer; address zone; OfferItem[] offer; ConsiderationItem[] consideration; uint8 orderType; uint256 startTime; uint256 endTime; bytes32 zoneHash; uint256 salt; bytes32 conduitKey; uint256 totalOriginalConsiderationItems; }
            struct OrderComponents { address offerer; address zone; OfferItem[] offer; ConsiderationItem[] consideration; uint8 orderType; uint256 startTime; uint256 endTime; bytes32 zoneHash; uint256 salt; bytes32 conduitKey; uint256 counter; }
            struct Order { OrderParameters parameters; bytes signature; }
            struct AdvancedOrder { OrderParameters parameters; uint120 numerator; uint120 denominator; bytes signature; bytes extraData; }
            struct CriteriaResolver { uint256 orderIndex; uint8 side; uint256 index; uint256 identifier; bytes32[] criteriaProof; }

            function validate(Order[] orders) external returns (bool validated)
            function cancel(OrderComponents[] orders) external returns (bool cancelled)
            function incrementCounter() external returns (uint256 newCounter)
            function fulfillOrder(Order order, bytes32 fulfillerConduitKey) external payable returns (bool fulfilled)
            function fulfillAdvancedOrder(AdvancedOrder advancedOrder, CriteriaResolver[] criteriaResolvers, bytes32 fulfillerConduitKey, address recipient) external payable returns (bool fulfilled)

            function getCounter(address offerer) external view returns (uint256 counter)
            function getOrderHash(OrderComponents order) external view returns (bytes32 orderHash)
            function getOrderStatus(bytes32 orderHash) external view returns (bool isValidated, bool isCancelled, uint256 totalFilled, uint256 totalSize)
        ]"#
    );
}

pub mod erc20 {
    use ethers::contract::abigen;

    // `approve` is declared without a return value so tokens that return
    // nothing can still be approved.
    abigen!(
        Erc20,
        r#"[
            function balanceOf(address owner) external view returns (uint256)
            function allowance(address owner, address spender) external view returns (uint256)
            function approve(address spender, uint256 amount) external
        ]"#
    );
}

pub mod erc721 {
    use ethers::contract::abigen;

    abigen!(
        Erc721,
        r#"[
            function ownerOf(uint256 tokenId) external view returns (address)
            function isApprovedForAll(address owner, address operator) external view returns (bool)
            function setApprovalForAll(address operator, bool approved) external
        ]"#
    );
}

pub mod erc1155 {
    use ethers::contract::abigen;

    abigen!(
        Erc1155,
        r#"[
            function balanceOf(address account, uint256 id) external view returns (uint256)
            function isApprovedForAll(address account, address operator) external view returns (bool)
            function setApprovalForAll(address operator, bool approved) external
        ]"#
    );
}
